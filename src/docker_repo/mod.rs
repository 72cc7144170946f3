// Docker container stats via bollard

pub mod stats;

use crate::error::CollectError;
use bollard::Docker;
use bollard::errors::Error as DockerError;
use bollard::query_parameters::{InspectContainerOptions, StatsOptions};
use bollard::models::ContainerStatsResponse;
use futures_util::StreamExt;
use std::future::Future;

/// One point-in-time stats read for a container.
pub type StatsSnapshot = ContainerStatsResponse;

/// Where per-container stats come from. Implemented by [`DockerRepo`]; tests
/// substitute in-memory sources.
pub trait StatsSource: Send + Sync {
    /// Probe the runtime once per pass.
    fn ping(&self) -> impl Future<Output = Result<(), CollectError>> + Send;

    /// Resolve a container name to its id.
    fn resolve(&self, name: &str) -> impl Future<Output = Result<String, CollectError>> + Send;

    /// Fetch a single, non-streaming stats sample.
    fn fetch_stats(
        &self,
        name: &str,
        id: &str,
    ) -> impl Future<Output = Result<StatsSnapshot, CollectError>> + Send;
}

pub struct DockerRepo {
    docker: Docker,
}

impl DockerRepo {
    pub fn connect() -> anyhow::Result<Self> {
        let docker = Docker::connect_with_unix_defaults()?;
        Ok(Self { docker })
    }
}

impl StatsSource for DockerRepo {
    async fn ping(&self) -> Result<(), CollectError> {
        self.docker
            .ping()
            .await
            .map(|_| ())
            .map_err(CollectError::RuntimeConnection)
    }

    async fn resolve(&self, name: &str) -> Result<String, CollectError> {
        let inspect = self
            .docker
            .inspect_container(name, Some(InspectContainerOptions::default()))
            .await
            .map_err(|e| match e {
                DockerError::DockerResponseServerError {
                    status_code: 404, ..
                } => CollectError::ContainerNotFound(name.to_string()),
                other => CollectError::StatsFetch {
                    name: name.to_string(),
                    reason: other.to_string(),
                },
            })?;
        Ok(inspect.id.unwrap_or_else(|| name.to_string()))
    }

    async fn fetch_stats(&self, name: &str, id: &str) -> Result<StatsSnapshot, CollectError> {
        // one_shot = false so the daemon fills precpu_stats from a prior sample
        let options = StatsOptions {
            stream: false,
            one_shot: false,
            ..Default::default()
        };
        let mut stream = self.docker.stats(id, Some(options));
        match stream.next().await {
            Some(Ok(s)) => Ok(s),
            Some(Err(DockerError::DockerResponseServerError {
                status_code: 404, ..
            })) => Err(CollectError::ContainerNotFound(name.to_string())),
            Some(Err(e)) => Err(CollectError::StatsFetch {
                name: name.to_string(),
                reason: e.to_string(),
            }),
            None => Err(CollectError::StatsFetch {
                name: name.to_string(),
                reason: "empty stats response".into(),
            }),
        }
    }
}
