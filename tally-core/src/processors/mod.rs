//! Processors that drain the request queue.
//!
//! - `Aggregator`: applies one `UpdateRequest` to the `AccumulatorStore`
//! - `WorkerPool`: N identical workers feeding dequeued requests to an `Aggregator`

pub mod aggregator;
pub mod worker_pool;

pub use aggregator::Aggregator;
pub use worker_pool::WorkerPool;
