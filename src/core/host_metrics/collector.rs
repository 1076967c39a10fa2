use std::path::Path;

use sysinfo::{
    Disks, MemoryRefreshKind, Networks, ProcessRefreshKind, ProcessStatus, RefreshKind, System,
    UpdateKind, Users,
};

use crate::core::config::LogRegistry;
use crate::core::log_tailer::tail_lines;
use crate::error::{HostMetricsError, Result};
use crate::platform;
use crate::ui::formatters::{format_epoch_secs, format_size, now_timestamp, round_to};

use super::metrics::*;
use super::sampler::CpuSampler;

pub fn host_name() -> String {
    System::host_name().unwrap_or_else(|| "unknown".to_string())
}

fn percent(part: u64, total: u64) -> f64 {
    if total > 0 {
        round_to(part as f64 / total as f64 * 100.0, 1)
    } else {
        0.0
    }
}

// ---------------------------------------------------------------------------
// CPU and memory
// ---------------------------------------------------------------------------

pub fn collect_cpu_info(sampler: &CpuSampler) -> CpuInfo {
    let sample = sampler.sample();

    CpuInfo {
        host: host_name(),
        timestamp: now_timestamp(),
        cpu_count: sample.cpu_count,
        avg_cpu_load: round_to(sample.average as f64, 1),
        last_boot: format_epoch_secs(System::boot_time()),
        cpu_load_per_core: sample
            .per_core
            .iter()
            .map(|&usage| round_to(usage as f64, 1))
            .collect(),
    }
}

pub fn collect_mem_info() -> MemInfo {
    let system = System::new_with_specifics(
        RefreshKind::nothing().with_memory(MemoryRefreshKind::nothing().with_ram()),
    );

    let total = system.total_memory();
    let available = system.available_memory();

    MemInfo {
        host: host_name(),
        timestamp: now_timestamp(),
        current_memory_used: format_size(system.used_memory()),
        current_memory_free: format_size(available),
        memory_usage_percent: percent(total.saturating_sub(available), total),
        total_available_memory: format_size(total),
    }
}

// ---------------------------------------------------------------------------
// Disks
// ---------------------------------------------------------------------------

/// Sum counters over whole disks so partitions are not counted twice.
pub fn sum_io_counters<F>(counters: &[DiskIoCounters], is_whole_disk: F) -> DiskIoCounters
where
    F: Fn(&str) -> bool,
{
    counters
        .iter()
        .filter(|c| is_whole_disk(&c.device))
        .fold(DiskIoCounters::default(), |mut total, c| {
            total.read_count += c.read_count;
            total.write_count += c.write_count;
            total.read_bytes += c.read_bytes;
            total.write_bytes += c.write_bytes;
            total
        })
}

/// Share of the space usable by unprivileged users that is allocated.
pub fn disk_usage_percent(space: &DiskSpace) -> f64 {
    percent(space.used, space.used + space.available)
}

pub fn collect_disk_info() -> DiskInfo {
    let disks = Disks::new_with_refreshed_list();

    let root = disks
        .iter()
        .find(|disk| disk.mount_point() == Path::new("/"))
        .or_else(|| disks.iter().next());
    let space = root
        .map(|disk| {
            platform::disk_space(disk.mount_point()).unwrap_or_else(|| DiskSpace {
                total: disk.total_space(),
                used: disk.total_space().saturating_sub(disk.available_space()),
                available: disk.available_space(),
            })
        })
        .unwrap_or_default();

    let disk_partitions = disks
        .iter()
        .map(|disk| DiskPartition {
            device: disk.name().to_string_lossy().to_string(),
            mount_point: disk.mount_point().to_string_lossy().to_string(),
        })
        .collect();

    let counters = platform::disk_io_counters();
    let totals = sum_io_counters(&counters, platform::is_whole_disk);

    let disk_statistics = counters
        .iter()
        .map(|c| DiskStatistics {
            device: c.device.clone(),
            read_count: c.read_count,
            write_count: c.write_count,
            bytes_read: format_size(c.read_bytes),
            bytes_written: format_size(c.write_bytes),
        })
        .collect();

    DiskInfo {
        host: host_name(),
        timestamp: now_timestamp(),
        total_disk_usage: format_size(space.total),
        used_disk_usage: format_size(space.used),
        free_disk_usage: format_size(space.available),
        percent_disk_usage: disk_usage_percent(&space),
        disk_num_reads: totals.read_count,
        disk_num_writes: totals.write_count,
        disk_read_bytes: format_size(totals.read_bytes),
        disk_write_bytes: format_size(totals.write_bytes),
        disk_partitions,
        disk_statistics,
    }
}

// ---------------------------------------------------------------------------
// Network
// ---------------------------------------------------------------------------

fn collect_nic_data() -> Vec<NicData> {
    let networks = Networks::new_with_refreshed_list();

    let mut nics: Vec<NicData> = networks
        .iter()
        .map(|(name, data)| {
            let mut address: Vec<String> = data
                .ip_networks()
                .iter()
                .map(|net| net.addr.to_string())
                .collect();
            address.push(data.mac_address().to_string());

            NicData {
                interface: name.to_string(),
                address,
                bytes_sent: format_size(data.total_transmitted()),
                bytes_recv: format_size(data.total_received()),
            }
        })
        .collect();

    nics.sort_by(|a, b| a.interface.cmp(&b.interface));
    nics
}

/// Keep sockets with both a remote peer and a status; listening sockets drop out.
pub fn connected_sockets(sockets: Vec<SocketEntry>) -> Vec<NetConnection> {
    sockets
        .into_iter()
        .filter_map(|socket| {
            let remote = socket.remote?;
            let status = socket.status.filter(|s| !s.is_empty())?;

            Some(NetConnection {
                ip: remote.ip().to_string(),
                port: remote.port(),
                status,
                pid: socket.pid,
                process_name: socket.pid.and(socket.process_name),
            })
        })
        .collect()
}

pub fn connected_users(sessions: Vec<UserSession>) -> Vec<ConnectedUser> {
    sessions
        .into_iter()
        .map(|session| ConnectedUser {
            username: session.username,
            terminal: session.terminal,
            host: session.host,
            start_time: format_epoch_secs(session.started),
        })
        .collect()
}

/// Everything `/network_info` reports except the latency probe; the caller
/// fills in `avg_latency` once the probe finishes.
pub fn collect_network_info() -> NetworkInfo {
    NetworkInfo {
        host: host_name(),
        timestamp: now_timestamp(),
        avg_latency: String::new(),
        nic_data: collect_nic_data(),
        net_connections: connected_sockets(platform::socket_table()),
        connected_users: connected_users(platform::logged_in_users()),
    }
}

// ---------------------------------------------------------------------------
// Processes
// ---------------------------------------------------------------------------

/// Lower-case status names matching what `ps`-style tools report.
fn status_name(status: ProcessStatus) -> &'static str {
    match status {
        ProcessStatus::Run => "running",
        ProcessStatus::Sleep => "sleeping",
        ProcessStatus::Idle => "idle",
        ProcessStatus::Stop => "stopped",
        ProcessStatus::Zombie => "zombie",
        ProcessStatus::Tracing => "tracing-stop",
        ProcessStatus::Dead => "dead",
        ProcessStatus::Wakekill => "wake-kill",
        ProcessStatus::Waking => "waking",
        ProcessStatus::Parked => "parked",
        ProcessStatus::LockBlocked => "locked",
        ProcessStatus::UninterruptibleDiskSleep => "disk-sleep",
        _ => "unknown",
    }
}

/// Snapshot the process table. Processes that exit while we walk the table
/// simply drop out of the listing.
pub fn read_process_table() -> Vec<ProcessEntry> {
    let system = System::new_with_specifics(
        RefreshKind::nothing().with_processes(
            ProcessRefreshKind::nothing()
                .with_cpu()
                .with_memory()
                .with_user(UpdateKind::OnlyIfNotSet),
        ),
    );
    let users = Users::new_with_refreshed_list();

    system
        .processes()
        .values()
        .filter(|proc| proc.thread_kind().is_none())
        .map(|proc| ProcessEntry {
            pid: proc.pid().as_u32(),
            name: proc.name().to_string_lossy().to_string(),
            username: proc
                .user_id()
                .and_then(|uid| users.get_user_by_id(uid))
                .map(|user| user.name().to_string()),
            status: status_name(proc.status()).to_string(),
            vms_bytes: proc.virtual_memory(),
            cpu_time_secs: proc.accumulated_cpu_time() as f64 / 1000.0,
        })
        .collect()
}

/// Sort by cumulative CPU time, highest first, then keep `length` rows.
/// The sort is stable, so ties keep enumeration order.
pub fn top_processes(mut processes: Vec<ProcessEntry>, length: usize) -> Vec<ProcessEntry> {
    processes.sort_by(|a, b| {
        b.cpu_time_secs
            .partial_cmp(&a.cpu_time_secs)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    processes.truncate(length);
    processes
}

pub fn collect_process_info(length: usize) -> ProcessInfo {
    let process_list = top_processes(read_process_table(), length)
        .into_iter()
        .map(|p| ProcessRow {
            pid: p.pid,
            name: p.name,
            username: p.username,
            status: p.status,
            vms: format_size(p.vms_bytes),
            cpu_time: round_to(p.cpu_time_secs, 2),
        })
        .collect();

    ProcessInfo {
        host: host_name(),
        timestamp: now_timestamp(),
        process_list,
    }
}

// ---------------------------------------------------------------------------
// Logs
// ---------------------------------------------------------------------------

/// Tail every registered log. Unreadable files fail the call; files with
/// invalid UTF-8 in their tail are left out of the result.
pub fn collect_logs_info(registry: &LogRegistry, length: usize) -> Result<LogsInfo> {
    let mut config_paths = Vec::with_capacity(registry.len());

    for source in registry.sources() {
        match tail_lines(&source.path, length) {
            Ok(log) => config_paths.push(LogTail {
                log_name: source.path.to_string_lossy().to_string(),
                log_key: source.name.clone(),
                log,
            }),
            Err(HostMetricsError::InvalidUtf8(path)) => {
                log::warn!(
                    "Skipping log '{}': {} is not valid UTF-8",
                    source.name,
                    path.display()
                );
            }
            Err(e) => return Err(e),
        }
    }

    Ok(LogsInfo {
        host: host_name(),
        timestamp: now_timestamp(),
        config_paths,
    })
}
