use crate::error::{Result, ScanError};
use serde::Serialize;
use std::mem::MaybeUninit;
use std::path::Path;

const GB: f64 = 1_073_741_824.0;

#[derive(Debug, Serialize)]
pub struct DiskUsage {
    pub total_bytes: u64,
    pub used_bytes: u64,
    pub free_bytes: u64,
    pub total_gb: f64,
    pub used_gb: f64,
    pub free_gb: f64,
    pub usage_percent: f64,
}

/// Capacity of the volume holding `path`, via statvfs.
pub fn disk_usage(path: &Path) -> Result<DiskUsage> {
    use std::os::unix::ffi::OsStrExt;
    let mut raw = Vec::from(path.as_os_str().as_bytes());
    raw.push(0);

    let mut stat = MaybeUninit::<libc::statvfs>::uninit();
    let ret = unsafe { libc::statvfs(raw.as_ptr() as *const libc::c_char, stat.as_mut_ptr()) };
    if ret != 0 {
        return Err(ScanError::Io(std::io::Error::last_os_error()));
    }
    let stat = unsafe { stat.assume_init() };

    let block_size = stat.f_frsize as u64;
    let total_bytes = stat.f_blocks as u64 * block_size;
    let free_bytes = stat.f_bavail as u64 * block_size;
    let used_bytes = total_bytes.saturating_sub(free_bytes);

    Ok(DiskUsage {
        total_bytes,
        used_bytes,
        free_bytes,
        total_gb: total_bytes as f64 / GB,
        used_gb: used_bytes as f64 / GB,
        free_gb: free_bytes as f64 / GB,
        usage_percent: if total_bytes > 0 {
            used_bytes as f64 / total_bytes as f64 * 100.0
        } else {
            0.0
        },
    })
}
