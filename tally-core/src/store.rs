//! Shared per-key aggregate table.
//!
//! Every mutation goes through [`AccumulatorStore::apply_update`], which holds
//! the key's entry guard across the whole read-compute-write step. Two
//! updates of the same key therefore never observe the same previous state,
//! while updates of keys living in different shards proceed in parallel.

use crate::model::{AggregateState, Key};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::Arc;

/// Concurrency-safe mapping from key to its current [`AggregateState`].
///
/// Cheap to clone; clones share the same table.
#[derive(Clone, Default)]
pub struct AccumulatorStore {
    states: Arc<DashMap<Key, AggregateState>>,
}

impl AccumulatorStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current aggregates of `key`, or `None` if it was never updated.
    pub fn get(&self, key: &str) -> Option<AggregateState> {
        self.states.get(key).map(|entry| entry.value().clone())
    }

    /// Atomically replace the state of `key` with `f(previous)` and return
    /// the new state. A key without state starts from
    /// [`AggregateState::zero`].
    ///
    /// `f` runs while the key's shard is write-locked, so it must not touch
    /// this store.
    pub fn apply_update<F>(&self, key: &Key, f: F) -> AggregateState
    where
        F: FnOnce(&AggregateState) -> AggregateState,
    {
        match self.states.entry(key.clone()) {
            Entry::Occupied(mut entry) => {
                let next = f(entry.get());
                entry.insert(next.clone());
                next
            }
            Entry::Vacant(entry) => {
                let next = f(&AggregateState::zero(key.clone()));
                entry.insert(next.clone());
                next
            }
        }
    }

    /// Copy of every key's state, ordered by key.
    ///
    /// Each element is read under its shard lock; the collection as a whole
    /// is not a point-in-time view.
    pub fn snapshot(&self) -> Vec<AggregateState> {
        let mut states: Vec<AggregateState> = self
            .states
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        states.sort_by(|a, b| a.key.cmp(&b.key));
        states
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}
