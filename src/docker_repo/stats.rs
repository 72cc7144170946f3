// Derive ContainerMetricSet from a raw Docker stats API response.
//
// Each field group (cpu, memory, network) is derived independently; a failure
// in one group zeroes that group only.

use crate::error::DerivationError;
use crate::models::ContainerMetricSet;
use bollard::models::ContainerStatsResponse;

/// Interface preferred for network counters when present.
pub const PREFERRED_INTERFACE: &str = "eth0";

/// CPU usage as a percent of total host capacity across all cores.
///
/// `(cpu_delta / system_delta) * 100` where both deltas are taken between
/// `precpu_stats` and `cpu_stats`. A container saturating one core of a
/// four-core host reports ~25%.
pub fn cpu_percent(s: &ContainerStatsResponse) -> Result<f64, DerivationError> {
    let cpu_stats = s
        .cpu_stats
        .as_ref()
        .ok_or(DerivationError::MissingField("cpu_stats"))?;
    let precpu_stats = s
        .precpu_stats
        .as_ref()
        .ok_or(DerivationError::MissingField("precpu_stats"))?;

    let total = cpu_stats
        .cpu_usage
        .as_ref()
        .and_then(|u| u.total_usage)
        .ok_or(DerivationError::MissingField("cpu_stats.cpu_usage.total_usage"))?;
    let pre_total = precpu_stats
        .cpu_usage
        .as_ref()
        .and_then(|u| u.total_usage)
        .ok_or(DerivationError::MissingField(
            "precpu_stats.cpu_usage.total_usage",
        ))?;
    let system = cpu_stats
        .system_cpu_usage
        .ok_or(DerivationError::MissingField("cpu_stats.system_cpu_usage"))?;
    let pre_system = precpu_stats
        .system_cpu_usage
        .ok_or(DerivationError::MissingField("precpu_stats.system_cpu_usage"))?;

    let system_delta = system
        .checked_sub(pre_system)
        .filter(|d| *d > 0)
        .ok_or(DerivationError::NonPositiveSystemDelta)?;
    let cpu_delta = total
        .checked_sub(pre_total)
        .ok_or(DerivationError::NegativeCpuDelta)?;

    Ok((cpu_delta as f64 / system_delta as f64) * 100.0)
}

/// Memory usage and limit in bytes; each defaults to 0 independently.
pub fn memory(s: &ContainerStatsResponse) -> (u64, u64) {
    let usage = s.memory_stats.as_ref().and_then(|m| m.usage).unwrap_or(0);
    let limit = s.memory_stats.as_ref().and_then(|m| m.limit).unwrap_or(0);
    (usage, limit)
}

/// Cumulative (rx, tx) bytes for one interface: `eth0` when present, otherwise
/// the lexicographically smallest interface name. No networks means no traffic.
pub fn network(s: &ContainerStatsResponse) -> Result<(u64, u64), DerivationError> {
    let Some(networks) = s.networks.as_ref() else {
        return Ok((0, 0));
    };
    let chosen = networks
        .get(PREFERRED_INTERFACE)
        .or_else(|| {
            networks
                .iter()
                .min_by(|a, b| a.0.cmp(b.0))
                .map(|(_, v)| v)
        });
    let Some(iface) = chosen else {
        return Ok((0, 0));
    };
    let rx = iface
        .rx_bytes
        .ok_or(DerivationError::MissingField("networks.rx_bytes"))?;
    let tx = iface
        .tx_bytes
        .ok_or(DerivationError::MissingField("networks.tx_bytes"))?;
    Ok((rx, tx))
}

/// Derive the full metric set. Never fails: every group that could not be
/// derived is zeroed and its error returned alongside for logging.
pub fn derive_metrics(s: &ContainerStatsResponse) -> (ContainerMetricSet, Vec<DerivationError>) {
    let mut degraded = Vec::new();

    let cpu_percent = cpu_percent(s).unwrap_or_else(|e| {
        degraded.push(e);
        0.0
    });
    let (memory_usage_bytes, memory_limit_bytes) = memory(s);
    let (network_rx_bytes, network_tx_bytes) = network(s).unwrap_or_else(|e| {
        degraded.push(e);
        (0, 0)
    });

    (
        ContainerMetricSet {
            cpu_percent,
            memory_usage_bytes,
            memory_limit_bytes,
            network_rx_bytes,
            network_tx_bytes,
        },
        degraded,
    )
}
