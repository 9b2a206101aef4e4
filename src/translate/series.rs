// Measurement and tag names written to the backend.

// Cumulative CPU usage
pub const CPU_USAGE_TOTAL: &str = "cpu_usage_total";
pub const CPU_USAGE_SYSTEM: &str = "cpu_usage_system";
pub const CPU_USAGE_USER: &str = "cpu_usage_user";
pub const CPU_USAGE_PER_CPU: &str = "cpu_usage_per_cpu";
/// Smoothed average of number of runnable threads x 1000.
pub const LOAD_AVERAGE: &str = "load_average";

pub const MEMORY_USAGE: &str = "memory_usage";
pub const MEMORY_MAX_USAGE: &str = "memory_max_usage";
/// Bytes of page cache memory.
pub const MEMORY_CACHE: &str = "memory_cache";
pub const MEMORY_RSS: &str = "memory_rss";
pub const MEMORY_SWAP: &str = "memory_swap";
pub const MEMORY_MAPPED_FILE: &str = "memory_mapped_file";
pub const MEMORY_WORKING_SET: &str = "memory_working_set";
/// Number of times memory usage hit the limit.
pub const MEMORY_FAILCNT: &str = "memory_failcnt";
/// Cumulative count of memory allocation failures.
pub const MEMORY_FAILURE: &str = "memory_failure";

pub const RX_BYTES: &str = "rx_bytes";
pub const RX_ERRORS: &str = "rx_errors";
pub const TX_BYTES: &str = "tx_bytes";
pub const TX_ERRORS: &str = "tx_errors";
pub const REFERENCED_MEMORY: &str = "referenced_memory";

pub const FS_LIMIT: &str = "fs_limit";
pub const FS_USAGE: &str = "fs_usage";

pub const HUGETLB_USAGE: &str = "hugetlb_usage";
pub const HUGETLB_MAX_USAGE: &str = "hugetlb_max_usage";
pub const HUGETLB_FAILCNT: &str = "hugetlb_failcnt";

pub const PERF_STAT: &str = "perf_stat";

pub const RESCTRL_MEMORY_BANDWIDTH_TOTAL: &str = "resctrl_memory_bandwidth_total";
pub const RESCTRL_MEMORY_BANDWIDTH_LOCAL: &str = "resctrl_memory_bandwidth_local";
/// Last level cache occupancy.
pub const RESCTRL_LLC_OCCUPANCY: &str = "resctrl_llc_occupancy";

pub const TAG_MACHINE: &str = "machine";
pub const TAG_CONTAINER_NAME: &str = "container_name";
pub const TAG_INSTANCE: &str = "instance";
pub const TAG_FAILURE_TYPE: &str = "failure_type";
pub const TAG_SCOPE: &str = "scope";
pub const TAG_TYPE: &str = "type";
pub const TAG_DEVICE: &str = "device";
pub const TAG_PAGE_SIZE: &str = "page_size";
pub const TAG_CPU: &str = "cpu";
pub const TAG_NAME: &str = "name";
pub const TAG_SCALING_RATIO: &str = "scaling_ratio";
pub const TAG_NODE_ID: &str = "node_id";
