// Container info + stats as reported by the metrics source (v2.0 REST shapes).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A container's static spec paired with its most recent stat samples,
/// oldest first.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContainerInfo {
    #[serde(default)]
    pub spec: ContainerSpec,
    #[serde(default)]
    pub stats: Vec<ContainerStats>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContainerSpec {
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default)]
    pub namespace: String,
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub has_cpu: bool,
    #[serde(default)]
    pub has_memory: bool,
    #[serde(default)]
    pub has_network: bool,
    #[serde(default)]
    pub has_filesystem: bool,
    #[serde(default)]
    pub has_hugetlb: bool,
}

impl ContainerSpec {
    /// Display name: first alias, else the image name.
    pub fn display_name(&self) -> &str {
        self.aliases
            .first()
            .map(String::as_str)
            .unwrap_or(&self.image)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContainerStats {
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub cpu: Option<CpuStats>,
    #[serde(default)]
    pub memory: Option<MemoryStats>,
    #[serde(default)]
    pub network: Option<NetworkStats>,
    #[serde(default)]
    pub filesystem: Option<FilesystemStats>,
    #[serde(default)]
    pub hugetlb: Option<BTreeMap<String, HugetlbStats>>,
    #[serde(default)]
    pub perf_stats: Vec<PerfStat>,
    #[serde(default)]
    pub referenced_memory: u64,
    #[serde(default)]
    pub resctrl: ResctrlStats,
}

impl ContainerStats {
    /// Empty sample at `timestamp`; every family absent.
    pub fn at(timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            cpu: None,
            memory: None,
            network: None,
            filesystem: None,
            hugetlb: None,
            perf_stats: Vec::new(),
            referenced_memory: 0,
            resctrl: ResctrlStats::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CpuStats {
    #[serde(default)]
    pub usage: CpuUsage,
    /// Smoothed number of runnable threads x 1000.
    #[serde(default)]
    pub load_average: i32,
}

/// Cumulative CPU time in nanoseconds.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CpuUsage {
    #[serde(default)]
    pub total: u64,
    /// Absent when the source does not report per-core usage.
    #[serde(default)]
    pub per_cpu_usage: Option<Vec<u64>>,
    #[serde(default)]
    pub user: u64,
    #[serde(default)]
    pub system: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryStats {
    #[serde(default)]
    pub usage: u64,
    #[serde(default)]
    pub max_usage: u64,
    #[serde(default)]
    pub cache: u64,
    #[serde(default)]
    pub rss: u64,
    #[serde(default)]
    pub swap: u64,
    #[serde(default)]
    pub mapped_file: u64,
    #[serde(default)]
    pub working_set: u64,
    #[serde(default)]
    pub failcnt: u64,
    #[serde(default)]
    pub container_data: MemoryStatsMemoryData,
    #[serde(default)]
    pub hierarchical_data: MemoryStatsMemoryData,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryStatsMemoryData {
    #[serde(default)]
    pub pgfault: u64,
    #[serde(default)]
    pub pgmajfault: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NetworkStats {
    #[serde(default)]
    pub interfaces: Vec<InterfaceStats>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InterfaceStats {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub rx_bytes: u64,
    #[serde(default)]
    pub rx_packets: u64,
    #[serde(default)]
    pub rx_errors: u64,
    #[serde(default)]
    pub rx_dropped: u64,
    #[serde(default)]
    pub tx_bytes: u64,
    #[serde(default)]
    pub tx_packets: u64,
    #[serde(default)]
    pub tx_errors: u64,
    #[serde(default)]
    pub tx_dropped: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilesystemStats {
    #[serde(rename = "totalUsageBytes", default)]
    pub total_usage_bytes: Option<u64>,
    #[serde(rename = "baseUsageBytes", default)]
    pub base_usage_bytes: Option<u64>,
    #[serde(rename = "inodeUsage", default)]
    pub inode_usage: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HugetlbStats {
    #[serde(default)]
    pub usage: u64,
    #[serde(default)]
    pub max_usage: u64,
    #[serde(default)]
    pub failcnt: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PerfStat {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub scaling_ratio: f64,
    #[serde(default)]
    pub value: u64,
    #[serde(default)]
    pub cpu: i32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResctrlStats {
    /// One entry per memory node.
    #[serde(default)]
    pub memory_bandwidth: Vec<MemoryBandwidthStats>,
    /// One entry per node with cache telemetry.
    #[serde(default)]
    pub cache: Vec<CacheStats>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryBandwidthStats {
    #[serde(rename = "mbm_total_bytes", default)]
    pub total_bytes: u64,
    #[serde(rename = "mbm_local_bytes", default)]
    pub local_bytes: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CacheStats {
    #[serde(default)]
    pub llc_occupancy: u64,
}
