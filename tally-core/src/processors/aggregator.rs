//! Aggregator processor.
//!
//! Folds a single `UpdateRequest` into the shared store. This is the only
//! write path into the `AccumulatorStore` used by the pipeline.

use crate::aggregation::combine;
use crate::model::{AggregateState, UpdateRequest};
use crate::store::AccumulatorStore;
use kanau::processor::Processor;
use std::convert::Infallible;

#[derive(Clone)]
pub struct Aggregator {
    store: AccumulatorStore,
}

impl Aggregator {
    pub fn new(store: AccumulatorStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &AccumulatorStore {
        &self.store
    }
}

impl Processor<UpdateRequest> for Aggregator {
    type Output = AggregateState;
    type Error = Infallible;

    async fn process(&self, req: UpdateRequest) -> Result<AggregateState, Infallible> {
        Ok(self
            .store
            .apply_update(req.key(), |previous| combine(previous, &req)))
    }
}
