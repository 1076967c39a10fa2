use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

// ---------------------------------------------------------------------------
// Raw readings gathered from sysinfo and the platform layer
// ---------------------------------------------------------------------------

/// CPU usage since the previous sample
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CpuSample {
    pub cpu_count: usize,
    pub average: f32,
    pub per_core: Vec<f32>,
}

/// Cumulative I/O counters for one block device
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiskIoCounters {
    pub device: String,
    pub read_count: u64,
    pub write_count: u64,
    pub read_bytes: u64,
    pub write_bytes: u64,
}

/// Capacity of one mounted filesystem, in bytes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiskSpace {
    pub total: u64,
    /// Allocated blocks; root-reserved free blocks are not counted
    pub used: u64,
    /// Free space available to unprivileged users
    pub available: u64,
}

/// One inet socket from the OS socket table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SocketEntry {
    pub remote: Option<SocketAddr>,
    pub status: Option<String>,
    pub pid: Option<u32>,
    pub process_name: Option<String>,
}

/// A logged-in user session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserSession {
    pub username: String,
    pub terminal: Option<String>,
    pub host: Option<String>,
    pub started: u64, // Unix timestamp
}

/// One row of the process table before formatting
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProcessEntry {
    pub pid: u32,
    pub name: String,
    pub username: Option<String>,
    pub status: String,
    pub vms_bytes: u64,
    pub cpu_time_secs: f64, // user + system
}

// ---------------------------------------------------------------------------
// JSON documents served by the HTTP layer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CpuInfo {
    pub host: String,
    pub timestamp: String,
    pub cpu_count: usize,
    pub avg_cpu_load: f64,
    pub last_boot: String,
    pub cpu_load_per_core: Vec<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemInfo {
    pub host: String,
    pub timestamp: String,
    pub current_memory_used: String,
    pub current_memory_free: String,
    pub memory_usage_percent: f64,
    pub total_available_memory: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiskInfo {
    pub host: String,
    pub timestamp: String,
    pub total_disk_usage: String,
    pub used_disk_usage: String,
    pub free_disk_usage: String,
    pub percent_disk_usage: f64,
    pub disk_num_reads: u64,
    pub disk_num_writes: u64,
    pub disk_read_bytes: String,
    pub disk_write_bytes: String,
    pub disk_partitions: Vec<DiskPartition>,
    pub disk_statistics: Vec<DiskStatistics>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DiskPartition {
    pub device: String,
    pub mount_point: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DiskStatistics {
    pub device: String,
    pub read_count: u64,
    pub write_count: u64,
    pub bytes_read: String,
    pub bytes_written: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NetworkInfo {
    pub host: String,
    pub timestamp: String,
    pub avg_latency: String,
    pub nic_data: Vec<NicData>,
    pub net_connections: Vec<NetConnection>,
    pub connected_users: Vec<ConnectedUser>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct NicData {
    pub interface: String,
    pub address: Vec<String>,
    pub bytes_sent: String,
    pub bytes_recv: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct NetConnection {
    pub ip: String,
    pub port: u16,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pid: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub process_name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConnectedUser {
    pub username: String,
    pub terminal: Option<String>,
    pub host: Option<String>,
    pub start_time: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProcessInfo {
    pub host: String,
    pub timestamp: String,
    pub process_list: Vec<ProcessRow>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ProcessRow {
    pub pid: u32,
    pub name: String,
    pub username: Option<String>,
    pub status: String,
    pub vms: String,
    pub cpu_time: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogsInfo {
    pub host: String,
    pub timestamp: String,
    pub config_paths: Vec<LogTail>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct LogTail {
    /// Path of the log file
    pub log_name: String,
    /// Key of the entry in the `[Logs]` section
    pub log_key: String,
    pub log: Vec<String>,
}
