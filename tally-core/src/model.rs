//! Domain types flowing through the ingestion pipeline.

use compact_str::CompactString;
use tally_sdk::objects::{CalculationRequest, CalculationResult};
use thiserror::Error;

/// Caller-supplied identifier of an independent aggregation series.
pub type Key = CompactString;

/// Reasons a submission cannot become an [`UpdateRequest`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidRequest {
    #[error("ID must not be empty")]
    EmptyKey,
}

/// One accepted update, consumed exactly once by a worker.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateRequest {
    key: Key,
    value1: f64,
    value2: f64,
    value3: f64,
}

impl UpdateRequest {
    pub fn new(
        key: impl Into<Key>,
        value1: f64,
        value2: f64,
        value3: f64,
    ) -> Result<Self, InvalidRequest> {
        let key = key.into();
        if key.is_empty() {
            return Err(InvalidRequest::EmptyKey);
        }
        Ok(Self {
            key,
            value1,
            value2,
            value3,
        })
    }

    pub fn key(&self) -> &Key {
        &self.key
    }

    pub fn value1(&self) -> f64 {
        self.value1
    }

    pub fn value2(&self) -> f64 {
        self.value2
    }

    pub fn value3(&self) -> f64 {
        self.value3
    }
}

impl TryFrom<CalculationRequest> for UpdateRequest {
    type Error = InvalidRequest;

    fn try_from(value: CalculationRequest) -> Result<Self, Self::Error> {
        Self::new(value.id, value.valor1, value.valor2, value.valor3)
    }
}

/// Running aggregates of one key.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateState {
    pub key: Key,
    pub sum_result: f64,
    pub diff_result: f64,
}

impl AggregateState {
    /// The state a key starts from before its first update.
    pub fn zero(key: Key) -> Self {
        Self {
            key,
            sum_result: 0.0,
            diff_result: 0.0,
        }
    }
}

impl From<AggregateState> for CalculationResult {
    fn from(value: AggregateState) -> Self {
        CalculationResult {
            id: value.key,
            sum_result: value.sum_result,
            diff_result: value.diff_result,
        }
    }
}
