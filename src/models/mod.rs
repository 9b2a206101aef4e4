// Domain models: source snapshots, time-series points, endpoint payloads

mod container;
mod metrics_list;
mod point;

pub use container::{
    CacheStats, ContainerInfo, ContainerSpec, ContainerStats, CpuStats, CpuUsage,
    FilesystemStats, HugetlbStats, InterfaceStats, MemoryBandwidthStats, MemoryStats,
    MemoryStatsMemoryData, NetworkStats, PerfStat, ResctrlStats,
};
pub use metrics_list::MetricsList;
pub use point::{FIELD_VALUE, FieldValue, Point, make_point};
