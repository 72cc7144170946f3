// Background collection worker.
// Runs a pass, then sleeps a fixed interval; period = pass duration + interval.

use crate::collector::StatsCollector;
use crate::docker_repo::StatsSource;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::time::{Duration, sleep};

/// Collector, shared pass counter, and shutdown for the worker.
pub struct WorkerDeps<S> {
    pub collector: Arc<StatsCollector<S>>,
    /// Incremented after every pass, including aborted ones.
    pub passes_total: Arc<AtomicU64>,
    pub shutdown_rx: tokio::sync::oneshot::Receiver<()>,
}

pub struct WorkerConfig {
    pub containers: Vec<String>,
    pub interval_secs: u64,
}

pub fn spawn<S>(deps: WorkerDeps<S>, config: WorkerConfig) -> tokio::task::JoinHandle<()>
where
    S: StatsSource + 'static,
{
    let WorkerDeps {
        collector,
        passes_total,
        mut shutdown_rx,
    } = deps;
    let WorkerConfig {
        containers,
        interval_secs,
    } = config;
    let interval = Duration::from_secs(interval_secs);

    tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = collector.collect_once(&containers) => {}
                _ = &mut shutdown_rx => {
                    tracing::debug!("Worker shutting down");
                    break;
                }
            }
            passes_total.fetch_add(1, Ordering::Relaxed);

            tokio::select! {
                _ = sleep(interval) => {}
                _ = &mut shutdown_rx => {
                    tracing::debug!("Worker shutting down");
                    break;
                }
            }
        }
    })
}
