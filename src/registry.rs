// Latest metrics per container, exposed in Prometheus text format

use crate::models::ContainerMetricSet;
use prometheus::core::{Collector, Desc};
use prometheus::proto::MetricFamily;
use prometheus::{Encoder, GaugeVec, Opts, Registry, TextEncoder};
use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock};

pub const CPU_USAGE_PERCENT: &str = "container_cpu_usage_percent";
pub const MEMORY_USAGE_BYTES: &str = "container_memory_usage_bytes";
pub const MEMORY_LIMIT_BYTES: &str = "container_memory_limit_bytes";
pub const NETWORK_RX_BYTES: &str = "container_network_rx_bytes";
pub const NETWORK_TX_BYTES: &str = "container_network_tx_bytes";

const LABEL: &str = "name";

type Entries = Arc<RwLock<BTreeMap<String, ContainerMetricSet>>>;

/// Holds the last published [`ContainerMetricSet`] for each container name.
///
/// One writer (the worker) and any number of scrapers share it. Whole sets are
/// swapped under a write lock and scrapes render from a read-locked view, so a
/// scrape never sees half of an update. Entries are never evicted.
#[derive(Clone)]
pub struct MetricsRegistry {
    entries: Entries,
    registry: Registry,
}

impl MetricsRegistry {
    pub fn new() -> prometheus::Result<Self> {
        let entries: Entries = Arc::new(RwLock::new(BTreeMap::new()));
        let registry = Registry::new();
        registry.register(Box::new(ContainerCollector::new(entries.clone())?))?;
        Ok(Self { entries, registry })
    }

    /// Replace all five values for `name`.
    pub fn set(&self, name: &str, metrics: ContainerMetricSet) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.to_string(), metrics);
    }

    pub fn get(&self, name: &str) -> Option<ContainerMetricSet> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .copied()
    }

    /// Snapshot of every entry, ordered by container name.
    pub fn read_all(&self) -> BTreeMap<String, ContainerMetricSet> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Render the registry in the Prometheus text exposition format.
    pub fn encode(&self) -> prometheus::Result<String> {
        let mut buf = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buf)?;
        String::from_utf8(buf).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}

/// The five gauge families, labeled by container name.
struct Families {
    cpu_usage: GaugeVec,
    memory_usage: GaugeVec,
    memory_limit: GaugeVec,
    network_rx: GaugeVec,
    network_tx: GaugeVec,
}

impl Families {
    fn new() -> prometheus::Result<Self> {
        let gauge = |name: &str, help: &str| GaugeVec::new(Opts::new(name, help), &[LABEL]);
        Ok(Self {
            cpu_usage: gauge(CPU_USAGE_PERCENT, "Container CPU usage percentage")?,
            memory_usage: gauge(MEMORY_USAGE_BYTES, "Container memory usage in bytes")?,
            memory_limit: gauge(MEMORY_LIMIT_BYTES, "Container memory limit in bytes")?,
            network_rx: gauge(NETWORK_RX_BYTES, "Container network bytes received")?,
            network_tx: gauge(NETWORK_TX_BYTES, "Container network bytes transmitted")?,
        })
    }

    fn all(&self) -> [&GaugeVec; 5] {
        [
            &self.cpu_usage,
            &self.memory_usage,
            &self.memory_limit,
            &self.network_rx,
            &self.network_tx,
        ]
    }

    fn record(&self, name: &str, m: &ContainerMetricSet) {
        let labels = [name];
        self.cpu_usage.with_label_values(&labels).set(m.cpu_percent);
        self.memory_usage
            .with_label_values(&labels)
            .set(m.memory_usage_bytes as f64);
        self.memory_limit
            .with_label_values(&labels)
            .set(m.memory_limit_bytes as f64);
        self.network_rx
            .with_label_values(&labels)
            .set(m.network_rx_bytes as f64);
        self.network_tx
            .with_label_values(&labels)
            .set(m.network_tx_bytes as f64);
    }
}

/// Builds fresh gauge families from the entry map on every scrape.
struct ContainerCollector {
    entries: Entries,
    descs: Vec<Desc>,
}

impl ContainerCollector {
    fn new(entries: Entries) -> prometheus::Result<Self> {
        let descs = Families::new()?
            .all()
            .iter()
            .flat_map(|f| f.desc().into_iter().cloned())
            .collect();
        Ok(Self { entries, descs })
    }
}

impl Collector for ContainerCollector {
    fn desc(&self) -> Vec<&Desc> {
        self.descs.iter().collect()
    }

    fn collect(&self) -> Vec<MetricFamily> {
        let families = match Families::new() {
            Ok(f) => f,
            Err(e) => {
                tracing::warn!(error = %e, operation = "collect", "gauge families unavailable");
                return Vec::new();
            }
        };
        {
            let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
            for (name, m) in entries.iter() {
                families.record(name, m);
            }
        }
        families.all().iter().flat_map(|f| f.collect()).collect()
    }
}
