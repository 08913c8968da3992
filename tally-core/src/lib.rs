#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![forbid(unsafe_code)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

pub mod aggregation;
pub mod config;
pub mod model;
pub mod processors;
pub mod queue;
pub mod report;
pub mod store;

pub use model::{AggregateState, InvalidRequest, Key, UpdateRequest};
pub use queue::{EnqueueError, RequestReceiver, RequestSender, request_queue};
pub use store::AccumulatorStore;
