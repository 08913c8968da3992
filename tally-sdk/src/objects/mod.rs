pub mod calculation;
pub mod results;

pub use calculation::CalculationRequest;
pub use results::{CalculationResult, SnapshotResponse};
