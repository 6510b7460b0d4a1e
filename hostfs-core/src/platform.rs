//! Provides platform-specific functionality.
//!
//! This module holds the seam between the utility and the operating system's
//! volume APIs. [`VolumeSource`] describes the queries the utility
//! needs, and [`SystemVolumes`] answers them for the running OS.
//!
//! It uses conditional compilation (`#[cfg]`) to expose the correct
//! implementation for the target OS. Each submodule exposes the same
//! `SystemVolumes` type, so the rest of the library can use it without
//! worrying about the underlying platform.

use std::io;
use std::path::{Path, PathBuf};

#[cfg(unix)]
mod unix;
#[cfg(unix)]
pub use self::unix::*;

#[cfg(windows)]
mod windows;
#[cfg(windows)]
pub use self::windows::*;

/// A mounted filesystem store as reported by the OS.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MountedStore {
    /// The device or source name of the store (e.g. `/dev/sda1`, `tmpfs`).
    pub name: String,
    /// The textual mount location of the store.
    pub mount_point: String,
}

impl MountedStore {
    pub fn new(name: impl Into<String>, mount_point: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mount_point: mount_point.into(),
        }
    }
}

/// Capacity of the filesystem behind a volume, in bytes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VolumeSpace {
    pub total: u64,
    /// Space available to the calling user.
    pub free: u64,
}

/// The operating system queries the volume functions rely on.
///
/// Implementations must not cache between calls; every method reflects the
/// volumes present at the time it is called.
pub trait VolumeSource {
    /// Filesystem root directories, in the order the OS enumerates them.
    fn root_directories(&self) -> Vec<PathBuf>;

    /// Queries the backing store of `root` and returns its name.
    ///
    /// Fails when the root has no backing store, as with an empty optical
    /// drive.
    fn store_name(&self, root: &Path) -> io::Result<String>;

    /// Every mounted store, in the order the OS enumerates them.
    fn mounted_stores(&self) -> Vec<MountedStore>;

    /// Total and free space of the filesystem containing `root`.
    fn space(&self, root: &Path) -> io::Result<VolumeSpace>;
}

impl<T: VolumeSource + ?Sized> VolumeSource for &T {
    fn root_directories(&self) -> Vec<PathBuf> {
        (**self).root_directories()
    }

    fn store_name(&self, root: &Path) -> io::Result<String> {
        (**self).store_name(root)
    }

    fn mounted_stores(&self) -> Vec<MountedStore> {
        (**self).mounted_stores()
    }

    fn space(&self, root: &Path) -> io::Result<VolumeSpace> {
        (**self).space(root)
    }
}
