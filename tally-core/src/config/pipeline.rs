//! Request queue and worker pool sizing.

use serde::{Deserialize, Serialize};

/// Queue capacity used when none is configured.
pub const DEFAULT_QUEUE_CAPACITY: usize = 100;

/// Worker count used when none is configured.
pub const DEFAULT_WORKERS: usize = 5;

/// What a submission does when the request queue is full.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverflowPolicy {
    /// Fail immediately; the HTTP boundary answers 503.
    #[default]
    Reject,
    /// Wait until a worker frees a slot.
    Block,
}

/// Shape of the ingestion pipeline, fixed for the process lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    pub queue_capacity: usize,
    pub workers: usize,
    pub overflow: OverflowPolicy,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            workers: DEFAULT_WORKERS,
            overflow: OverflowPolicy::default(),
        }
    }
}
