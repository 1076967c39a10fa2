//! Host metrics reader.
//!
//! Wraps sysinfo and the platform probes, and shapes each reading into the
//! JSON document served for its category.

mod collector;
pub mod latency;
mod metrics;
mod sampler;

pub use collector::{
    collect_cpu_info, collect_disk_info, collect_logs_info, collect_mem_info,
    collect_network_info, collect_process_info, connected_sockets, connected_users,
    disk_usage_percent, host_name, read_process_table, sum_io_counters, top_processes,
};
pub use latency::{format_latency, parse_ping_output, PingProbe, DEFAULT_PROBE_HOST, UNREACHABLE};
pub use metrics::{
    ConnectedUser, CpuInfo, CpuSample, DiskInfo, DiskIoCounters, DiskPartition, DiskSpace,
    DiskStatistics, LogTail, LogsInfo, MemInfo, NetConnection, NetworkInfo, NicData,
    ProcessEntry, ProcessInfo, ProcessRow, SocketEntry, UserSession,
};
pub use sampler::CpuSampler;
