//! Volume enumeration, display labels and capacity.
//!
//! Enumeration and labelling are best-effort: volumes that cannot be queried
//! are left out of [`DriveScan::drives`] (and recorded in
//! [`DriveScan::skipped`]), and labels that cannot be determined fall back to
//! a synthesized placeholder.

use std::fmt;
use std::path::{Path, PathBuf};

use log::debug;

use crate::error::{Error, Result};
use crate::host::{HostEnv, HostOs};
use crate::platform::{VolumeSource, VolumeSpace};

/// Label of the volume entry that stands for the home directory.
pub const HOME_DIRECTORY_LABEL: &str = "Home directory";

/// Label of the POSIX root filesystem.
pub const ROOT_DIRECTORY_LABEL: &str = "Root directory";

/// Prefix of device files backing real storage on POSIX systems.
const DEVICE_PREFIX: &str = "/dev/";

const SIZE_SUFFIXES: [&str; 7] = ["bytes", "KB", "MB", "GB", "TB", "PB", "EB"];

/// Why a volume was left out of a [`DriveScan`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SkipReason {
    /// Querying the backing store failed, usually because no medium is
    /// inserted. Holds the OS error text.
    NoMedium(String),
    /// The store is not backed by a device file (pseudo-filesystems,
    /// network mounts and the like).
    NotDeviceBacked,
    /// The OS reported the volume without a root or mount path to name it by.
    NoIdentifier,
}

/// A volume the scan saw but did not report.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SkippedVolume {
    /// The root path or mount path of the volume. For
    /// [`SkipReason::NoIdentifier`] this is the device name, if any.
    pub volume: String,
    pub reason: SkipReason,
}

impl fmt::Display for SkippedVolume {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.reason {
            SkipReason::NoMedium(err) => write!(f, "{:<15} [No medium: {}]", self.volume, err),
            SkipReason::NotDeviceBacked => write!(f, "{:<15} [Not device-backed]", self.volume),
            SkipReason::NoIdentifier => write!(f, "{:<15} [No mount path]", self.volume),
        }
    }
}

/// The outcome of [`list_drives`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DriveScan {
    /// Volume identifiers, the home directory first.
    pub drives: Vec<String>,
    /// Volumes that were seen but excluded.
    pub skipped: Vec<SkippedVolume>,
}

/// Enumerates the volumes a user can browse.
///
/// The home directory always comes first. On Windows-like hosts every root
/// whose backing store answers is reported by its drive letter; on POSIX-like
/// hosts every store mounted from a `/dev/` device is reported by its mount
/// path (the first whitespace-delimited token of it).
///
/// This never fails. Excluded volumes are listed in [`DriveScan::skipped`].
pub fn list_drives<S: VolumeSource>(env: &HostEnv, source: &S) -> DriveScan {
    let mut scan = DriveScan {
        drives: vec![env.home_id()],
        skipped: Vec::new(),
    };

    match env.host_os() {
        HostOs::Windows => {
            for root in source.root_directories() {
                let root_text = root.to_string_lossy().into_owned();
                let Some(letter) = root_text.chars().next() else {
                    debug!("skipping a root with an empty path");
                    scan.skipped.push(SkippedVolume {
                        volume: root_text,
                        reason: SkipReason::NoIdentifier,
                    });
                    continue;
                };

                match source.store_name(&root) {
                    Ok(_) => scan.drives.push(letter.to_string()),
                    Err(e) => {
                        debug!("skipping root {}: {}", root_text, e);
                        scan.skipped.push(SkippedVolume {
                            volume: root_text,
                            reason: SkipReason::NoMedium(e.to_string()),
                        });
                    }
                }
            }
        }
        HostOs::Posix => {
            for store in source.mounted_stores() {
                let Some(path) = store.mount_point.split_whitespace().next() else {
                    debug!("skipping '{}' without a mount path", store.name);
                    scan.skipped.push(SkippedVolume {
                        volume: store.name,
                        reason: SkipReason::NoIdentifier,
                    });
                    continue;
                };

                if store.name.starts_with(DEVICE_PREFIX) {
                    scan.drives.push(path.to_string());
                } else {
                    debug!("skipping mount {} from '{}'", path, store.name);
                    scan.skipped.push(SkippedVolume {
                        volume: path.to_string(),
                        reason: SkipReason::NotDeviceBacked,
                    });
                }
            }
        }
    }

    scan
}

/// The last segment of a POSIX path, with `.` and `..` kept as written.
fn last_segment(path: &str) -> Option<&str> {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        return None;
    }
    trimmed.rsplit('/').next()
}

/// Returns the display label of a volume identifier, or the reason none
/// could be produced.
///
/// A Windows volume label is returned as the store reports it, even when it
/// is empty.
///
/// # Errors
///
/// Returns [`Error::NoLabel`] when a Windows backing store cannot be queried,
/// or when a POSIX identifier has no final path segment (an empty string or
/// only separators).
pub fn drive_label_checked<S: VolumeSource>(
    env: &HostEnv,
    source: &S,
    drive: &str,
) -> Result<String> {
    if drive == env.home_id() {
        return Ok(HOME_DIRECTORY_LABEL.to_string());
    }

    let no_label = |reason: String| Error::NoLabel {
        drive: drive.to_string(),
        reason,
    };

    match env.host_os() {
        HostOs::Windows => {
            let root = format!("{drive}:\\");
            source
                .store_name(Path::new(&root))
                .map_err(|e| no_label(e.to_string()))
        }
        HostOs::Posix => {
            if drive == "/" {
                return Ok(ROOT_DIRECTORY_LABEL.to_string());
            }
            last_segment(drive)
                .map(str::to_string)
                .ok_or_else(|| no_label("path has no final segment".to_string()))
        }
    }
}

/// Returns the display label of a volume identifier.
///
/// Falls back to `Drive (<identifier>)` whenever [`drive_label_checked`]
/// fails.
pub fn drive_label<S: VolumeSource>(env: &HostEnv, source: &S, drive: &str) -> String {
    drive_label_checked(env, source, drive).unwrap_or_else(|e| {
        debug!("{}", e);
        format!("Drive ({drive})")
    })
}

/// The directory a volume identifier stands for: the home directory, a
/// Windows drive letter's root (`X` becomes `X:\`), or the mount path.
pub fn drive_root(env: &HostEnv, drive: &str) -> PathBuf {
    if drive == env.home_id() {
        return env.home_dir().to_path_buf();
    }
    if env.is_windows_like() && drive.chars().count() == 1 {
        return PathBuf::from(format!("{drive}:\\"));
    }
    PathBuf::from(drive)
}

/// Total and free space of the filesystem behind a volume identifier.
///
/// # Errors
///
/// Returns [`Error::Io`] with the volume's root when the OS query fails.
pub fn drive_space<S: VolumeSource>(
    env: &HostEnv,
    source: &S,
    drive: &str,
) -> Result<VolumeSpace> {
    let root = drive_root(env, drive);
    source.space(&root).map_err(|e| Error::Io {
        path: root,
        source: e,
    })
}

/// Formats a byte count with 1024-based suffixes, truncated to two decimals
/// (`1536` is `1.5 KB`, `0` is `0 bytes`).
pub fn format_size(bytes: u64) -> String {
    let mut place = 0;
    let mut unit = 1u64;
    while place < SIZE_SUFFIXES.len() - 1 && bytes / unit >= 1024 {
        unit *= 1024;
        place += 1;
    }

    let value = bytes as f64 / unit as f64;
    let truncated = (value * 100.0).trunc() / 100.0;
    format!("{} {}", truncated, SIZE_SUFFIXES[place])
}
