// Per-container derived metrics

use serde::{Deserialize, Serialize};
use std::fmt;

const MIB: u64 = 1024 * 1024;

/// The five values published per monitored container. Every field is always
/// present; fields that could not be derived hold zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerMetricSet {
    /// Percent of total host CPU capacity (all cores), not per-core.
    pub cpu_percent: f64,
    pub memory_usage_bytes: u64,
    pub memory_limit_bytes: u64,
    /// Cumulative bytes received on the selected interface.
    pub network_rx_bytes: u64,
    /// Cumulative bytes transmitted on the selected interface.
    pub network_tx_bytes: u64,
}

impl fmt::Display for ContainerMetricSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CPU={:.2}%, Mem={}MB/{}MB, Net RX/TX={}/{}",
            self.cpu_percent,
            self.memory_usage_bytes / MIB,
            self.memory_limit_bytes / MIB,
            self.network_rx_bytes,
            self.network_tx_bytes
        )
    }
}
