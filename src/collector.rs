// One collection pass: fetch, derive, publish, per monitored container.

use crate::docker_repo::StatsSource;
use crate::docker_repo::stats::derive_metrics;
use crate::error::CollectError;
use crate::models::ContainerMetricSet;
use crate::registry::MetricsRegistry;
use std::future::Future;
use std::sync::Arc;
use tokio::time::{Duration, timeout};
use tracing::instrument;

/// What a single pass did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassSummary {
    pub published: usize,
    pub skipped: usize,
    /// The runtime could not be reached; no container was attempted.
    pub aborted: bool,
}

pub struct StatsCollector<S> {
    source: Arc<S>,
    registry: MetricsRegistry,
    fetch_timeout: Duration,
}

impl<S: StatsSource> StatsCollector<S> {
    pub fn new(source: Arc<S>, registry: MetricsRegistry, fetch_timeout: Duration) -> Self {
        Self {
            source,
            registry,
            fetch_timeout,
        }
    }

    pub fn registry(&self) -> &MetricsRegistry {
        &self.registry
    }

    /// Poll each container in order and publish what could be derived.
    ///
    /// Never fails. A container that cannot be resolved or fetched keeps its
    /// previous registry values; an unreachable runtime ends the pass early.
    #[instrument(skip_all, fields(operation = "collect_once", containers = names.len()))]
    pub async fn collect_once(&self, names: &[String]) -> PassSummary {
        let mut summary = PassSummary::default();

        match timeout(self.fetch_timeout, self.source.ping()).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "Error connecting to Docker");
                summary.aborted = true;
                return summary;
            }
            Err(_) => {
                tracing::warn!(
                    timeout_secs = self.fetch_timeout.as_secs(),
                    "Docker ping timed out"
                );
                summary.aborted = true;
                return summary;
            }
        }

        for name in names {
            match self.collect_container(name).await {
                Ok(metrics) => {
                    self.registry.set(name, metrics);
                    tracing::info!(container = %name, "{}: {}", name, metrics);
                    summary.published += 1;
                }
                Err(CollectError::ContainerNotFound(_)) => {
                    tracing::warn!(container = %name, "Container {} not found", name);
                    summary.skipped += 1;
                }
                Err(e) => {
                    tracing::warn!(
                        container = %name,
                        error = %e,
                        "Error collecting stats for {}",
                        name
                    );
                    summary.skipped += 1;
                }
            }
        }

        tracing::debug!(
            published = summary.published,
            skipped = summary.skipped,
            "pass complete"
        );
        summary
    }

    async fn collect_container(&self, name: &str) -> Result<ContainerMetricSet, CollectError> {
        let id = self.bounded(name, self.source.resolve(name)).await?;
        let snapshot = self.bounded(name, self.source.fetch_stats(name, &id)).await?;
        let (metrics, degraded) = derive_metrics(&snapshot);
        for e in &degraded {
            tracing::debug!(container = %name, error = %e, "field group degraded to zero");
        }
        Ok(metrics)
    }

    async fn bounded<T>(
        &self,
        name: &str,
        fut: impl Future<Output = Result<T, CollectError>>,
    ) -> Result<T, CollectError> {
        timeout(self.fetch_timeout, fut)
            .await
            .map_err(|_| CollectError::Timeout {
                name: name.to_string(),
                secs: self.fetch_timeout.as_secs(),
            })?
    }
}
