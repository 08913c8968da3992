//! The fold applied to every update.

use crate::model::{AggregateState, UpdateRequest};

/// Combine the previous aggregates of a key with one more update.
///
/// `sum' = sum + (v1 + v2)` and `diff' = diff - (v3 - v2)`. Non-finite
/// inputs propagate through ordinary floating-point arithmetic.
pub fn combine(previous: &AggregateState, req: &UpdateRequest) -> AggregateState {
    AggregateState {
        key: previous.key.clone(),
        sum_result: previous.sum_result + (req.value1() + req.value2()),
        diff_result: previous.diff_result - (req.value3() - req.value2()),
    }
}
