//! WorkerPool processor.
//!
//! The WorkerPool is responsible for:
//! - Spawning a fixed number of identical workers sharing one `RequestReceiver`
//! - Applying every dequeued request through the `Aggregator`
//! - Logging the full aggregate table after each update when reporting is enabled
//! - Stopping on end-of-stream or when the shutdown signal fires
//!
//! Workers do not own keys. Two requests for the same key may be picked up by
//! different workers, so they can be applied in a different order than they
//! were submitted; the store only guarantees that neither update is lost.

use crate::config::{ConfigStore, ReportConfig};
use crate::model::UpdateRequest;
use crate::processors::Aggregator;
use crate::queue::RequestReceiver;
use crate::report::render_table;
use crate::store::AccumulatorStore;
use kanau::processor::Processor;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

/// Owning handle over the running workers.
pub struct WorkerPool {
    handles: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// Spawn `size` workers draining `receiver` into `store`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(
        size: usize,
        receiver: RequestReceiver,
        store: AccumulatorStore,
        report: ConfigStore<ReportConfig>,
        shutdown_rx: watch::Receiver<bool>,
    ) -> Self {
        let aggregator = Aggregator::new(store);
        let handles = (0..size)
            .map(|id| {
                let worker = Worker {
                    id,
                    aggregator: aggregator.clone(),
                    receiver: receiver.clone(),
                    report: report.clone(),
                };
                tokio::spawn(worker.run(shutdown_rx.clone()))
            })
            .collect::<Vec<_>>();

        info!("WorkerPool started with {} workers", handles.len());
        Self { handles }
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Wait for every worker to exit.
    pub async fn join(self) {
        for handle in self.handles {
            if let Err(e) = handle.await {
                error!(error = %e, "Worker task failed");
            }
        }
        info!("WorkerPool shutdown complete");
    }
}

struct Worker {
    id: usize,
    aggregator: Aggregator,
    receiver: RequestReceiver,
    report: ConfigStore<ReportConfig>,
}

impl Worker {
    async fn run(self, mut shutdown_rx: watch::Receiver<bool>) {
        debug!(worker = self.id, "Worker started");

        if *shutdown_rx.borrow_and_update() {
            return;
        }

        // Subscribe before the first read so no reload is missed.
        let mut report_watcher = self.report.subscribe();
        let mut report_enabled = self.report.get().await.enabled;

        loop {
            tokio::select! {
                biased;

                // A dropped sender counts as shutdown.
                changed = shutdown_rx.changed() => {
                    if changed.is_err() || *shutdown_rx.borrow() {
                        debug!(worker = self.id, "Worker received shutdown signal");
                        break;
                    }
                }

                Ok(()) = report_watcher.changed() => {
                    report_enabled = self.report.get().await.enabled;
                    debug!(worker = self.id, report_enabled, "Report config reloaded");
                }

                next = self.receiver.dequeue() => {
                    let Some(req) = next else {
                        debug!(worker = self.id, "Request queue closed");
                        break;
                    };
                    self.handle(req, report_enabled).await;
                }
            }
        }

        debug!(worker = self.id, "Worker stopped");
    }

    async fn handle(&self, req: UpdateRequest, report_enabled: bool) {
        let Ok(state) = self.aggregator.process(req).await;

        debug!(
            worker = self.id,
            key = %state.key,
            sum_result = state.sum_result,
            diff_result = state.diff_result,
            "Applied update"
        );

        if report_enabled {
            let table = render_table(&self.aggregator.store().snapshot());
            info!(target: "tally::report", "\n{table}");
        }
    }
}
