//! Filesystem capacity via statvfs(3).

use std::ffi::CString;
use std::io;
use std::os::unix::ffi::OsStrExt;
use std::path::Path;

use crate::core::host_metrics::DiskSpace;

/// Sizes from raw statvfs block counts.
pub fn space_from_blocks(fragment_size: u64, blocks: u64, free: u64, available: u64) -> DiskSpace {
    DiskSpace {
        total: blocks * fragment_size,
        used: blocks.saturating_sub(free) * fragment_size,
        available: available * fragment_size,
    }
}

#[allow(clippy::unnecessary_cast)]
pub fn disk_space(mount: &Path) -> io::Result<DiskSpace> {
    let path = CString::new(mount.as_os_str().as_bytes())
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

    // SAFETY: `path` is NUL-terminated and `stat` is a plain C struct that
    // statvfs fully initialises on success.
    let stat = unsafe {
        let mut stat: libc::statvfs = std::mem::zeroed();
        if libc::statvfs(path.as_ptr(), &mut stat) != 0 {
            return Err(io::Error::last_os_error());
        }
        stat
    };

    Ok(space_from_blocks(
        stat.f_frsize as u64,
        stat.f_blocks as u64,
        stat.f_bfree as u64,
        stat.f_bavail as u64,
    ))
}
