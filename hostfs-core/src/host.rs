//! Ambient properties of the host process.
//!
//! The utility never reads process-wide globals on its own. The home directory
//! and OS name are captured into a [`HostEnv`] once (usually through
//! [`HostEnv::detect`]) and passed to [`crate::HostFs`], so tests can simulate
//! either OS family deterministically.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// The OS family that decides path conventions and volume discovery.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HostOs {
    /// Drive letters and backslash separators.
    Windows,
    /// Device-backed mount points and forward slash separators.
    Posix,
}

impl HostOs {
    /// Classifies an OS name as reported by the runtime environment.
    pub fn from_os_name(os_name: &str) -> Self {
        if is_windows_like(os_name) {
            Self::Windows
        } else {
            Self::Posix
        }
    }

    pub fn is_windows(self) -> bool {
        self == Self::Windows
    }
}

/// Returns `true` when `os_name` contains "windows" in any letter case.
pub fn is_windows_like(os_name: &str) -> bool {
    os_name.to_lowercase().contains("windows")
}

/// The home directory and OS name of the process the utility serves.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HostEnv {
    home_dir: PathBuf,
    os_name: String,
}

impl HostEnv {
    pub fn new(home_dir: impl Into<PathBuf>, os_name: impl Into<String>) -> Self {
        Self {
            home_dir: home_dir.into(),
            os_name: os_name.into(),
        }
    }

    /// Captures the home directory and OS name of the running process.
    ///
    /// The OS name comes from `sysinfo`, falling back to the compile-time
    /// target OS when the system does not report one.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoHomeDirectory`] if the environment does not name a
    /// home directory.
    pub fn detect() -> Result<Self> {
        #[allow(deprecated)]
        let home_dir = std::env::home_dir()
            .filter(|p| !p.as_os_str().is_empty())
            .ok_or(Error::NoHomeDirectory)?;

        let os_name = sysinfo::System::name().unwrap_or_else(|| std::env::consts::OS.to_string());
        log::debug!("detected host '{}' with home {}", os_name, home_dir.display());

        Ok(Self { home_dir, os_name })
    }

    pub fn home_dir(&self) -> &Path {
        &self.home_dir
    }

    /// The home directory as a volume identifier string.
    pub fn home_id(&self) -> String {
        self.home_dir.to_string_lossy().into_owned()
    }

    pub fn os_name(&self) -> &str {
        &self.os_name
    }

    pub fn host_os(&self) -> HostOs {
        HostOs::from_os_name(&self.os_name)
    }

    pub fn is_windows_like(&self) -> bool {
        self.host_os().is_windows()
    }

    /// Returns a copy with the home directory replaced.
    pub fn with_home_dir(mut self, home_dir: impl Into<PathBuf>) -> Self {
        self.home_dir = home_dir.into();
        self
    }

    /// Returns a copy with the OS name replaced.
    pub fn with_os_name(mut self, os_name: impl Into<String>) -> Self {
        self.os_name = os_name.into();
        self
    }
}
