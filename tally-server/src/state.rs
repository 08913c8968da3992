//! Application state shared across all request handlers.

use tally_core::config::SharedConfig;
use tally_core::{AccumulatorStore, RequestSender};

/// Application state that is shared across all request handlers.
///
/// Cloneable and cheap to pass around (everything is behind Arc).
#[derive(Clone)]
pub struct AppState {
    /// Submitting half of the request queue.
    pub sender: RequestSender,
    /// Read access to the aggregates; handlers never write to it.
    pub store: AccumulatorStore,
    /// Runtime configuration.
    pub config: SharedConfig,
}

impl AppState {
    pub fn new(sender: RequestSender, store: AccumulatorStore, config: SharedConfig) -> Self {
        Self {
            sender,
            store,
            config,
        }
    }
}
