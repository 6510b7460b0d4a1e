//! The core, UI-agnostic library for the `hostfs` utility.
//!
//! `hostfs-core` is the adaptation layer between a device-management front-end
//! and the host operating system's filesystem. It enumerates the volumes a
//! user can browse, lists directory contents, converts paths between the
//! host-native form and a portable internal form, and deletes trees on a
//! best-effort basis.
//!
//! The library is structured into several key modules:
//! - [`host`]: The ambient OS properties (home directory, OS name) as an
//!   explicit [`HostEnv`] value.
//! - [`platform`]: Provides platform-specific volume queries behind the
//!   [`VolumeSource`] trait.
//! - [`volume`]: Drive enumeration, display labels and capacity.
//! - [`listing`]: Files and subdirectories of a directory.
//! - [`paths`]: Normalized and denormalized path forms.
//! - [`delete`]: Best-effort recursive deletion.
//!
//! [`HostFs`] bundles a [`HostEnv`] with a [`VolumeSource`] and is the usual
//! entry point.
//!
//! ## Example: Browsing the First Drive
//!
//! ```rust,no_run
//! use hostfs_core::HostFs;
//!
//! fn main() -> hostfs_core::Result<()> {
//!     let host = HostFs::detect()?;
//!
//!     for drive in host.list_drives().drives {
//!         println!("{:<30} {}", drive, host.drive_label(&drive));
//!     }
//!
//!     let home = host.env().home_dir().to_path_buf();
//!     for name in host.directories_in(&home)? {
//!         println!("{}/", host.normalize_path(&name));
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod delete;
mod error;
pub mod host;
pub mod listing;
pub mod paths;
pub mod platform;
pub mod volume;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

pub use crate::delete::{DeleteFailure, DeleteReport};
pub use crate::error::{Error, Result};
pub use crate::host::{HostEnv, HostOs, is_windows_like};
pub use crate::platform::{MountedStore, SystemVolumes, VolumeSource, VolumeSpace};
pub use crate::volume::{DriveScan, SkipReason, SkippedVolume, format_size};

/// The Path/Volume utility bound to one host.
///
/// Holds no state besides the injected [`HostEnv`] and [`VolumeSource`]; every
/// method is a single-shot call against the filesystem.
#[derive(Clone, Debug)]
pub struct HostFs<S = SystemVolumes> {
    env: HostEnv,
    source: S,
}

impl HostFs<SystemVolumes> {
    /// Binds to the running process and the real OS volume APIs.
    ///
    /// # Errors
    ///
    /// Fails when the home directory cannot be determined.
    pub fn detect() -> Result<Self> {
        Ok(Self::new(HostEnv::detect()?, SystemVolumes))
    }
}

impl<S: VolumeSource> HostFs<S> {
    pub fn new(env: HostEnv, source: S) -> Self {
        Self { env, source }
    }

    pub fn env(&self) -> &HostEnv {
        &self.env
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn host_os(&self) -> HostOs {
        self.env.host_os()
    }

    pub fn is_windows_like(&self) -> bool {
        self.env.is_windows_like()
    }

    /// See [`volume::list_drives`].
    pub fn list_drives(&self) -> DriveScan {
        volume::list_drives(&self.env, &self.source)
    }

    /// See [`volume::drive_label`].
    pub fn drive_label(&self, drive: &str) -> String {
        volume::drive_label(&self.env, &self.source, drive)
    }

    /// See [`volume::drive_label_checked`].
    pub fn drive_label_checked(&self, drive: &str) -> Result<String> {
        volume::drive_label_checked(&self.env, &self.source, drive)
    }

    /// See [`volume::drive_root`].
    pub fn drive_root(&self, drive: &str) -> PathBuf {
        volume::drive_root(&self.env, drive)
    }

    /// See [`volume::drive_space`].
    pub fn drive_space(&self, drive: &str) -> Result<VolumeSpace> {
        volume::drive_space(&self.env, &self.source, drive)
    }

    pub fn files_in(&self, dir: impl AsRef<Path>) -> Result<Vec<String>> {
        listing::files_in(dir)
    }

    pub fn directories_in(&self, dir: impl AsRef<Path>) -> Result<Vec<String>> {
        listing::directories_in(dir)
    }

    pub fn normalize_path(&self, path: &str) -> String {
        paths::normalize_path(self.host_os(), path)
    }

    pub fn denormalize_path(&self, path: &str) -> String {
        paths::denormalize_path(self.host_os(), path)
    }

    pub fn delete_path(&self, path: impl AsRef<Path>) -> DeleteReport {
        delete::delete_path(path)
    }

    /// See [`delete::delete_path_with_progress`].
    pub fn delete_path_with_progress<F>(
        &self,
        path: impl AsRef<Path>,
        running: Arc<AtomicBool>,
        on_removed: F,
    ) -> DeleteReport
    where
        F: FnMut(&Path),
    {
        delete::delete_path_with_progress(path, running, on_removed)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::*;
    use crate::volume::tests::{FakeVolumes, posix_volumes, windows_volumes};

    #[cfg(unix)]
    #[test]
    fn posix_host_end_to_end() {
        let home = tempdir().unwrap();
        fs::write(home.path().join("a.txt"), b"a").unwrap();
        fs::create_dir(home.path().join("c")).unwrap();

        let host = HostFs::new(HostEnv::new(home.path(), "Linux"), posix_volumes());
        assert!(!host.is_windows_like());

        let scan = host.list_drives();
        let home_id = home.path().to_string_lossy().into_owned();
        assert_eq!(scan.drives[0], home_id);
        assert_eq!(host.drive_label(&home_id), volume::HOME_DIRECTORY_LABEL);
        assert_eq!(host.drive_label("/"), volume::ROOT_DIRECTORY_LABEL);

        let dir = host.denormalize_path(&host.normalize_path(&home_id));
        assert_eq!(host.files_in(&dir).unwrap(), vec!["a.txt".to_string()]);
        assert_eq!(host.directories_in(&dir).unwrap(), vec!["c".to_string()]);

        let report = host.delete_path(home.path().join("c"));
        assert!(report.is_complete());
        assert!(host.directories_in(&dir).unwrap().is_empty());
    }

    #[test]
    fn windows_host_is_simulated_from_the_os_name() {
        let host = HostFs::new(
            HostEnv::new("C:\\Users\\me", "Microsoft Windows 11"),
            windows_volumes(),
        );

        assert!(host.is_windows_like());
        assert_eq!(host.list_drives().drives, vec!["C:\\Users\\me", "C", "E"]);
        assert_eq!(host.normalize_path("C:\\Users\\me"), "C:/Users/me");
        assert_eq!(host.denormalize_path("C:/Users/me"), "C:\\Users\\me");
        assert_eq!(host.drive_label("C"), "System");
        assert_eq!(host.drive_root("E"), PathBuf::from("E:\\"));
        assert_eq!(format_size(host.drive_space("C").unwrap().free), "100 GB");
    }

    #[test]
    fn borrowed_sources_work_too() {
        let volumes = FakeVolumes::default();
        let host = HostFs::new(HostEnv::new("/home/me", "Linux"), &volumes);
        assert_eq!(host.list_drives().drives, vec!["/home/me"]);
    }
}
