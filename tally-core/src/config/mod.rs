//! Configuration types for Tally.
//!
//! These are the validated runtime values; reading and parsing the config
//! file is handled by the server crate.

mod config_store;
mod pipeline;
mod report;
mod server;

pub use config_store::{ConfigStore, ConfigWatcher};
pub use pipeline::{DEFAULT_QUEUE_CAPACITY, DEFAULT_WORKERS, OverflowPolicy, PipelineConfig};
pub use report::ReportConfig;
pub use server::ServerConfig;

/// Configuration shared by the running process.
///
/// Only the report section can change after startup; the pipeline shape is
/// fixed once workers are spawned.
#[derive(Clone)]
pub struct SharedConfig {
    pub server: ServerConfig,
    pub pipeline: PipelineConfig,
    pub report: ConfigStore<ReportConfig>,
}

impl SharedConfig {
    pub fn new(server: ServerConfig, pipeline: PipelineConfig, report: ReportConfig) -> Self {
        Self {
            server,
            pipeline,
            report: ConfigStore::new(report),
        }
    }
}
