// Platform-specific code module
//
// Each probe has a Linux (or Unix) implementation and a fallback for the
// other targets, so callers never need their own cfg gates.

#[cfg(target_os = "linux")]
pub mod procfs;
#[cfg(any(target_os = "linux", target_os = "macos"))]
pub mod sessions;
#[cfg(unix)]
pub mod statvfs;

use std::path::Path;

use crate::core::host_metrics::{DiskIoCounters, DiskSpace, SocketEntry, UserSession};

/// Capacity of the filesystem mounted at `mount`, with root-reserved blocks
/// kept out of `used`. `None` where statvfs is unavailable.
pub fn disk_space(mount: &Path) -> Option<DiskSpace> {
    #[cfg(unix)]
    {
        match statvfs::disk_space(mount) {
            Ok(space) => Some(space),
            Err(e) => {
                log::debug!("statvfs({}) failed: {}", mount.display(), e);
                None
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = mount;
        None
    }
}

/// Per-device cumulative disk I/O counters.
pub fn disk_io_counters() -> Vec<DiskIoCounters> {
    #[cfg(target_os = "linux")]
    {
        match procfs::read_diskstats() {
            Ok(counters) => counters,
            Err(e) => {
                log::warn!("Failed to read /proc/diskstats: {}", e);
                Vec::new()
            }
        }
    }

    #[cfg(not(target_os = "linux"))]
    {
        get_fallback_disk_io()
    }
}

/// Whether a device from [`disk_io_counters`] is a whole disk (not a partition).
/// Only whole disks contribute to the aggregate counters.
pub fn is_whole_disk(device: &str) -> bool {
    #[cfg(target_os = "linux")]
    {
        procfs::is_whole_disk(device)
    }

    #[cfg(not(target_os = "linux"))]
    {
        let _ = device;
        true
    }
}

/// The inet socket table with owning processes resolved where possible.
pub fn socket_table() -> Vec<SocketEntry> {
    #[cfg(target_os = "linux")]
    {
        procfs::read_socket_table()
    }

    #[cfg(not(target_os = "linux"))]
    {
        log::debug!("Socket table enumeration is not supported on this platform");
        Vec::new()
    }
}

/// Users currently logged in.
pub fn logged_in_users() -> Vec<UserSession> {
    #[cfg(any(target_os = "linux", target_os = "macos"))]
    {
        sessions::read_user_sessions()
    }

    #[cfg(not(any(target_os = "linux", target_os = "macos")))]
    {
        Vec::new()
    }
}

/// Byte counters from sysinfo; operation counts are not available there.
#[cfg(not(target_os = "linux"))]
fn get_fallback_disk_io() -> Vec<DiskIoCounters> {
    let disks = sysinfo::Disks::new_with_refreshed_list();
    disks
        .iter()
        .map(|disk| {
            let usage = disk.usage();
            DiskIoCounters {
                device: disk.name().to_string_lossy().to_string(),
                read_count: 0,
                write_count: 0,
                read_bytes: usage.total_read_bytes,
                write_bytes: usage.total_written_bytes,
            }
        })
        .collect()
}
