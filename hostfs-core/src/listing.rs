//! Immediate children of a directory, filtered by kind.

use std::fs;
use std::path::Path;

use log::debug;

use crate::error::{Error, Result};

#[derive(Clone, Copy, PartialEq, Eq)]
enum EntryKind {
    File,
    Directory,
}

/// Collects the names of the entries of `dir` matching `kind`, in the order
/// the OS enumerates them. Symbolic links are followed when classifying.
fn entries_of_kind(dir: &Path, kind: EntryKind) -> Result<Vec<String>> {
    let meta = fs::metadata(dir).map_err(|e| Error::from_io(dir, e))?;
    if !meta.is_dir() {
        return Err(Error::NotADirectory(dir.to_path_buf()));
    }

    let entries = fs::read_dir(dir).map_err(|e| Error::from_io(dir, e))?;
    let mut names = Vec::new();

    for entry in entries {
        let entry = entry.map_err(|e| Error::from_io(dir, e))?;
        let path = entry.path();

        let meta = match fs::metadata(&path) {
            Ok(meta) => meta,
            Err(e) => {
                debug!("skipping unreadable entry {}: {}", path.display(), e);
                continue;
            }
        };

        let matches = match kind {
            EntryKind::File => meta.is_file(),
            EntryKind::Directory => meta.is_dir(),
        };
        if matches {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }

    Ok(names)
}

/// Lists the regular files directly inside `dir`.
///
/// # Errors
///
/// [`Error::NotFound`] if `dir` does not exist, [`Error::NotADirectory`] if it
/// is not a directory, and [`Error::Io`] for any other failure while reading
/// it.
pub fn files_in(dir: impl AsRef<Path>) -> Result<Vec<String>> {
    entries_of_kind(dir.as_ref(), EntryKind::File)
}

/// Lists the subdirectories directly inside `dir`.
///
/// Fails the same way as [`files_in`].
pub fn directories_in(dir: impl AsRef<Path>) -> Result<Vec<String>> {
    entries_of_kind(dir.as_ref(), EntryKind::Directory)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use tempfile::tempdir;

    use super::*;

    fn fixture() -> tempfile::TempDir {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), b"a").unwrap();
        fs::write(dir.path().join("b.txt"), b"b").unwrap();
        fs::create_dir(dir.path().join("c")).unwrap();
        fs::write(dir.path().join("c").join("nested.txt"), b"n").unwrap();
        dir
    }

    fn as_set(names: Vec<String>) -> HashSet<String> {
        names.into_iter().collect()
    }

    #[test]
    fn files_only_lists_regular_files() {
        let dir = fixture();
        let files = as_set(files_in(dir.path()).unwrap());
        assert_eq!(files, HashSet::from(["a.txt".to_string(), "b.txt".to_string()]));
    }

    #[test]
    fn directories_only_lists_subdirectories() {
        let dir = fixture();
        assert_eq!(directories_in(dir.path()).unwrap(), vec!["c".to_string()]);
    }

    #[test]
    fn empty_directory_lists_nothing() {
        let dir = tempdir().unwrap();
        assert!(files_in(dir.path()).unwrap().is_empty());
        assert!(directories_in(dir.path()).unwrap().is_empty());
    }

    #[test]
    fn missing_directory_is_not_found() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("gone");
        assert!(matches!(files_in(&missing), Err(Error::NotFound(p)) if p == missing));
        assert!(matches!(directories_in(&missing), Err(Error::NotFound(_))));
    }

    #[test]
    fn file_argument_is_not_a_directory() {
        let dir = fixture();
        let file = dir.path().join("a.txt");
        assert!(matches!(files_in(&file), Err(Error::NotADirectory(p)) if p == file));
        assert!(matches!(directories_in(&file), Err(Error::NotADirectory(_))));
    }

    #[cfg(unix)]
    #[test]
    fn links_are_classified_by_target_and_dangling_ones_skipped() {
        use std::os::unix::fs::symlink;

        let dir = fixture();
        symlink(dir.path().join("a.txt"), dir.path().join("link.txt")).unwrap();
        symlink(dir.path().join("c"), dir.path().join("link_dir")).unwrap();
        symlink(dir.path().join("missing"), dir.path().join("dangling")).unwrap();

        let files = as_set(files_in(dir.path()).unwrap());
        assert!(files.contains("link.txt"));
        assert!(!files.contains("dangling"));

        let dirs = as_set(directories_in(dir.path()).unwrap());
        assert_eq!(dirs, HashSet::from(["c".to_string(), "link_dir".to_string()]));
    }
}
