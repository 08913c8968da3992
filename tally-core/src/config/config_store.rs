//! Hot-swappable config value with change notification.

use std::sync::Arc;
use tokio::sync::{RwLock, RwLockReadGuard, watch};

/// A shared configuration value that can be replaced at runtime.
///
/// Readers take a short read lock per access. Every [`update`](Self::update)
/// bumps a generation number published on a `watch` channel, so tasks that
/// cache derived values can [`subscribe`](Self::subscribe) instead of polling.
pub struct ConfigStore<T> {
    inner: Arc<Inner<T>>,
}

struct Inner<T> {
    data: RwLock<T>,
    generation: watch::Sender<u64>,
}

/// Receives a notification each time the owning [`ConfigStore`] is updated.
pub struct ConfigWatcher {
    generation: watch::Receiver<u64>,
}

impl<T> ConfigStore<T> {
    pub fn new(initial: T) -> Self {
        let (generation, _) = watch::channel(0u64);
        Self {
            inner: Arc::new(Inner {
                data: RwLock::new(initial),
                generation,
            }),
        }
    }

    /// Replace the stored value and notify watchers.
    pub async fn update(&self, value: T) {
        *self.inner.data.write().await = value;
        self.inner.generation.send_modify(|g| *g += 1);
    }

    pub async fn read(&self) -> RwLockReadGuard<'_, T> {
        self.inner.data.read().await
    }

    /// Number of updates applied since creation.
    pub fn generation(&self) -> u64 {
        *self.inner.generation.borrow()
    }

    pub fn subscribe(&self) -> ConfigWatcher {
        ConfigWatcher {
            generation: self.inner.generation.subscribe(),
        }
    }
}

impl<T: Clone> ConfigStore<T> {
    /// Copy of the current value.
    pub async fn get(&self) -> T {
        self.inner.data.read().await.clone()
    }
}

impl<T> Clone for ConfigStore<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl ConfigWatcher {
    /// Wait for the next update. Errors once the store has been dropped.
    pub async fn changed(&mut self) -> Result<(), watch::error::RecvError> {
        self.generation.changed().await
    }
}
