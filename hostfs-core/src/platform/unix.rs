use std::io;
use std::path::{Path, PathBuf};

use log::warn;
use nix::sys::statvfs::statvfs;

use super::{MountedStore, VolumeSource, VolumeSpace};

/// Volume queries for Unix-like systems, backed by the kernel's mount table.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemVolumes;

/// Decodes the octal escapes (`\040` for a space and so on) the kernel uses
/// for whitespace and backslashes in mount table fields.
#[cfg(any(target_os = "linux", target_os = "android"))]
fn unescape_mount_field(field: &str) -> String {
    let bytes = field.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        let escape = bytes.get(i + 1..i + 4).filter(|digits| {
            bytes[i] == b'\\'
                && (b'0'..=b'3').contains(&digits[0])
                && digits[1..].iter().all(|d| (b'0'..=b'7').contains(d))
        });
        match escape {
            Some(digits) => {
                out.push((digits[0] - b'0') * 64 + (digits[1] - b'0') * 8 + (digits[2] - b'0'));
                i += 4;
            }
            None => {
                out.push(bytes[i]);
                i += 1;
            }
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}

/// Parses `/proc/self/mounts` text. The first field is the mount source,
/// which for block devices is the device file.
#[cfg(any(target_os = "linux", target_os = "android"))]
fn parse_mounts(table: &str) -> Vec<MountedStore> {
    table
        .lines()
        .filter_map(|line| {
            let mut fields = line.split_whitespace();
            let source = fields.next()?;
            let target = fields.next()?;
            Some(MountedStore::new(
                unescape_mount_field(source),
                unescape_mount_field(target),
            ))
        })
        .collect()
}

#[cfg(any(target_os = "linux", target_os = "android"))]
fn mount_table() -> io::Result<Vec<MountedStore>> {
    let table = std::fs::read_to_string("/proc/self/mounts")?;
    Ok(parse_mounts(&table))
}

#[cfg(any(
    target_os = "macos",
    target_os = "ios",
    target_os = "freebsd",
    target_os = "dragonfly",
    target_os = "openbsd"
))]
fn mount_table() -> io::Result<Vec<MountedStore>> {
    use std::ffi::CStr;

    let mut mounts: *mut libc::statfs = std::ptr::null_mut();
    let count = unsafe { libc::getmntinfo(&mut mounts, libc::MNT_NOWAIT) };
    if count <= 0 || mounts.is_null() {
        return Err(io::Error::last_os_error());
    }

    // The buffer is owned by libc and stays valid until the next call.
    let entries = unsafe { std::slice::from_raw_parts(mounts, count as usize) };
    Ok(entries
        .iter()
        .map(|entry| {
            let from = unsafe { CStr::from_ptr(entry.f_mntfromname.as_ptr()) };
            let on = unsafe { CStr::from_ptr(entry.f_mntonname.as_ptr()) };
            MountedStore::new(from.to_string_lossy(), on.to_string_lossy())
        })
        .collect())
}

#[cfg(not(any(
    target_os = "linux",
    target_os = "android",
    target_os = "macos",
    target_os = "ios",
    target_os = "freebsd",
    target_os = "dragonfly",
    target_os = "openbsd"
)))]
fn mount_table() -> io::Result<Vec<MountedStore>> {
    Err(io::Error::from(io::ErrorKind::Unsupported))
}

impl VolumeSource for SystemVolumes {
    fn root_directories(&self) -> Vec<PathBuf> {
        vec![PathBuf::from("/")]
    }

    /// Looks `root` up in the mount table and returns its source name.
    fn store_name(&self, root: &Path) -> io::Result<String> {
        mount_table()?
            .into_iter()
            .rev()
            .find(|store| Path::new(&store.mount_point) == root)
            .map(|store| store.name)
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("no store mounted at {}", root.display()),
                )
            })
    }

    /// Every entry of the mount table, unfiltered.
    fn mounted_stores(&self) -> Vec<MountedStore> {
        mount_table().unwrap_or_else(|e| {
            warn!("could not read the mount table: {}", e);
            Vec::new()
        })
    }

    fn space(&self, root: &Path) -> io::Result<VolumeSpace> {
        let stat = statvfs(root)?;
        let fragment = stat.fragment_size() as u64;
        Ok(VolumeSpace {
            total: stat.blocks() as u64 * fragment,
            free: stat.blocks_available() as u64 * fragment,
        })
    }
}
