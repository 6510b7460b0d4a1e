use std::ffi::OsStr;
use std::io;
use std::os::windows::ffi::OsStrExt;
use std::path::{Path, PathBuf};
use std::ptr;

use windows_sys::Win32::Storage::FileSystem::{
    GetDiskFreeSpaceExW, GetLogicalDrives, GetVolumeInformationW,
};

use super::{MountedStore, VolumeSource, VolumeSpace};

// MAX_PATH + 1, the documented upper bound for a volume name.
const VOLUME_NAME_LEN: usize = 261;

/// Volume queries for Windows, backed by the Win32 API.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemVolumes;

fn to_wide(s: &OsStr) -> Vec<u16> {
    s.encode_wide().chain(std::iter::once(0)).collect()
}

impl VolumeSource for SystemVolumes {
    /// Roots from the logical drive bitmask, `A:\` through `Z:\`.
    fn root_directories(&self) -> Vec<PathBuf> {
        let mask = unsafe { GetLogicalDrives() };
        (0..26u8)
            .filter(|bit| mask & (1 << bit) != 0)
            .map(|bit| PathBuf::from(format!("{}:\\", (b'A' + bit) as char)))
            .collect()
    }

    /// Reads the volume label of `root`.
    ///
    /// `GetVolumeInformationW` fails for drives without media, which is how
    /// empty card readers and optical drives are told apart.
    fn store_name(&self, root: &Path) -> io::Result<String> {
        let root_w = to_wide(root.as_os_str());
        let mut name = [0u16; VOLUME_NAME_LEN];

        let ok = unsafe {
            GetVolumeInformationW(
                root_w.as_ptr(),
                name.as_mut_ptr(),
                name.len() as u32,
                ptr::null_mut(),
                ptr::null_mut(),
                ptr::null_mut(),
                ptr::null_mut(),
                0,
            )
        };
        if ok == 0 {
            return Err(io::Error::last_os_error());
        }

        let len = name.iter().position(|&c| c == 0).unwrap_or(name.len());
        Ok(String::from_utf16_lossy(&name[..len]))
    }

    /// Mounted volumes as `sysinfo` reports them, keyed by volume label.
    fn mounted_stores(&self) -> Vec<MountedStore> {
        let disks = sysinfo::Disks::new_with_refreshed_list();
        disks
            .iter()
            .map(|disk| {
                MountedStore::new(
                    disk.name().to_string_lossy(),
                    disk.mount_point().to_string_lossy(),
                )
            })
            .collect()
    }

    fn space(&self, root: &Path) -> io::Result<VolumeSpace> {
        let root_w = to_wide(root.as_os_str());
        let mut free = 0u64;
        let mut total = 0u64;

        let ok = unsafe {
            GetDiskFreeSpaceExW(root_w.as_ptr(), &mut free, &mut total, ptr::null_mut())
        };
        if ok == 0 {
            return Err(io::Error::last_os_error());
        }

        Ok(VolumeSpace { total, free })
    }
}
