//! Best-effort recursive removal of files and directory trees.
//!
//! Deletion never stops at the first failure. Every entry that could not be
//! removed is recorded in the returned [`DeleteReport`] and the traversal
//! carries on with the rest of the tree.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use log::{debug, warn};

/// An entry that could not be removed.
#[derive(Debug)]
pub struct DeleteFailure {
    pub path: PathBuf,
    pub error: io::Error,
}

impl fmt::Display for DeleteFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path.display(), self.error)
    }
}

/// The outcome of a deletion.
#[derive(Debug, Default)]
pub struct DeleteReport {
    /// Number of files, links and directories removed.
    pub removed: usize,
    /// Entries that could not be removed or read.
    pub failures: Vec<DeleteFailure>,
    /// Whether the traversal was stopped through the `running` flag.
    pub cancelled: bool,
}

impl DeleteReport {
    /// `true` when everything under the target was removed.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty() && !self.cancelled
    }

    fn fail(&mut self, path: PathBuf, error: io::Error) {
        warn!("failed to delete {}: {}", path.display(), error);
        self.failures.push(DeleteFailure { path, error });
    }
}

enum Visit {
    /// Remove a file or link, or schedule a directory's children.
    Enter(PathBuf),
    /// Remove a directory whose children have all been visited.
    Leave(PathBuf),
}

#[cfg(windows)]
fn remove_link(path: &Path) -> io::Result<()> {
    // Directory links must be removed as directories on Windows.
    fs::remove_file(path).or_else(|_| fs::remove_dir(path))
}

#[cfg(not(windows))]
fn remove_link(path: &Path) -> io::Result<()> {
    fs::remove_file(path)
}

/// Deletes a file, or a directory and everything beneath it.
///
/// Symbolic links are removed themselves; the traversal never follows them.
/// A path that does not exist yields an empty, complete report.
pub fn delete_path(path: impl AsRef<Path>) -> DeleteReport {
    delete_path_with_progress(path, Arc::new(AtomicBool::new(true)), |_| {})
}

/// Deletes a file or directory tree, reporting each removed entry.
///
/// The tree is walked with an explicit stack, so deeply nested trees cannot
/// exhaust the call stack. Children are removed before their parent.
///
/// # Arguments
///
/// * `path` - The file or directory to delete.
/// * `running` - An `Arc<AtomicBool>` used to gracefully cancel the deletion.
///   If the flag is set to `false`, the traversal stops and the report is
///   marked as cancelled.
/// * `on_removed` - A closure that is called with the path of every entry
///   after it has been removed.
pub fn delete_path_with_progress<F>(
    path: impl AsRef<Path>,
    running: Arc<AtomicBool>,
    mut on_removed: F,
) -> DeleteReport
where
    F: FnMut(&Path),
{
    let root = path.as_ref();
    let mut report = DeleteReport::default();

    if let Err(e) = fs::symlink_metadata(root) {
        if e.kind() == io::ErrorKind::NotFound {
            debug!("nothing to delete at {}", root.display());
        } else {
            report.fail(root.to_path_buf(), e);
        }
        return report;
    }

    let mut stack = vec![Visit::Enter(root.to_path_buf())];

    while let Some(visit) = stack.pop() {
        if !running.load(Ordering::SeqCst) {
            debug!("deletion of {} cancelled", root.display());
            report.cancelled = true;
            break;
        }

        match visit {
            Visit::Enter(path) => {
                let file_type = match fs::symlink_metadata(&path) {
                    Ok(meta) => meta.file_type(),
                    Err(e) => {
                        report.fail(path, e);
                        continue;
                    }
                };

                if file_type.is_dir() {
                    let entries = match fs::read_dir(&path) {
                        Ok(entries) => entries,
                        Err(e) => {
                            report.fail(path, e);
                            continue;
                        }
                    };
                    stack.push(Visit::Leave(path.clone()));
                    for entry in entries {
                        match entry {
                            Ok(entry) => stack.push(Visit::Enter(entry.path())),
                            Err(e) => report.fail(path.clone(), e),
                        }
                    }
                    continue;
                }

                let removed = if file_type.is_symlink() {
                    remove_link(&path)
                } else {
                    fs::remove_file(&path)
                };
                match removed {
                    Ok(()) => {
                        report.removed += 1;
                        on_removed(&path);
                    }
                    Err(e) => report.fail(path, e),
                }
            }
            Visit::Leave(path) => match fs::remove_dir(&path) {
                Ok(()) => {
                    report.removed += 1;
                    on_removed(&path);
                }
                Err(e) => report.fail(path, e),
            },
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn removes_a_nested_tree() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("root");
        fs::create_dir_all(root.join("sub").join("deeper")).unwrap();
        fs::write(root.join("sub").join("file.txt"), b"x").unwrap();
        fs::write(root.join("sub").join("deeper").join("more.txt"), b"y").unwrap();
        fs::write(root.join("top.txt"), b"z").unwrap();

        let report = delete_path(&root);

        assert!(report.is_complete(), "{:?}", report.failures);
        assert_eq!(report.removed, 6);
        assert!(!root.exists());
        assert!(dir.path().exists());
    }

    #[test]
    fn removes_only_the_given_file() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("target.txt");
        let sibling = dir.path().join("sibling.txt");
        fs::write(&target, b"t").unwrap();
        fs::write(&sibling, b"s").unwrap();

        let report = delete_path(&target);

        assert!(report.is_complete());
        assert_eq!(report.removed, 1);
        assert!(!target.exists());
        assert!(sibling.exists());
    }

    #[test]
    fn missing_target_is_a_complete_no_op() {
        let dir = tempdir().unwrap();
        let report = delete_path(dir.path().join("never-existed"));

        assert!(report.is_complete());
        assert_eq!(report.removed, 0);
    }

    #[test]
    fn deep_trees_do_not_recurse() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("deep");
        let mut leaf = root.clone();
        for _ in 0..200 {
            leaf.push("d");
        }
        fs::create_dir_all(&leaf).unwrap();

        let report = delete_path(&root);

        assert!(report.is_complete());
        assert_eq!(report.removed, 201);
        assert!(!root.exists());
    }

    #[test]
    fn progress_sees_children_before_parents() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("root");
        fs::create_dir_all(root.join("sub")).unwrap();
        fs::write(root.join("sub").join("file.txt"), b"x").unwrap();

        let mut seen = Vec::new();
        let report = delete_path_with_progress(&root, Arc::new(AtomicBool::new(true)), |p| {
            seen.push(p.to_path_buf())
        });

        assert!(report.is_complete());
        assert_eq!(
            seen,
            vec![
                root.join("sub").join("file.txt"),
                root.join("sub"),
                root.clone(),
            ]
        );
    }

    #[test]
    fn cleared_flag_cancels_before_removing_anything() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("root");
        fs::create_dir_all(root.join("sub")).unwrap();

        let report = delete_path_with_progress(&root, Arc::new(AtomicBool::new(false)), |_| {});

        assert!(report.cancelled);
        assert!(!report.is_complete());
        assert_eq!(report.removed, 0);
        assert!(root.join("sub").exists());
    }

    #[cfg(unix)]
    #[test]
    fn links_are_removed_without_following() {
        use std::os::unix::fs::symlink;

        let dir = tempdir().unwrap();
        let outside = dir.path().join("outside");
        fs::create_dir(&outside).unwrap();
        fs::write(outside.join("keep.txt"), b"k").unwrap();

        let root = dir.path().join("root");
        fs::create_dir(&root).unwrap();
        symlink(&outside, root.join("link")).unwrap();

        let report = delete_path(&root);

        assert!(report.is_complete());
        assert_eq!(report.removed, 2);
        assert!(!root.exists());
        assert!(outside.join("keep.txt").exists());
    }

    #[cfg(unix)]
    #[test]
    fn unreadable_target_is_reported_as_a_failure() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("file.txt");
        fs::write(&file, b"f").unwrap();
        let target = file.join("x");

        let report = delete_path(&target);

        assert!(!report.is_complete());
        assert!(!report.cancelled);
        assert_eq!(report.removed, 0);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].path, target);
        assert!(file.exists());
    }

    #[cfg(unix)]
    #[test]
    fn traversal_continues_past_unremovable_entries() {
        use std::os::unix::fs::PermissionsExt;

        // Permission bits do not stop root.
        if nix::unistd::geteuid().is_root() {
            return;
        }

        let dir = tempdir().unwrap();
        let root = dir.path().join("root");
        let locked = root.join("locked");
        fs::create_dir_all(&locked).unwrap();
        fs::create_dir_all(root.join("zzz")).unwrap();
        fs::write(locked.join("a.txt"), b"a").unwrap();
        fs::write(root.join("aaa.txt"), b"a").unwrap();
        fs::write(root.join("zzz").join("b.txt"), b"b").unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o555)).unwrap();

        let report = delete_path(&root);

        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        assert!(!report.is_complete());
        let failed: Vec<_> = report.failures.iter().map(|f| f.path.clone()).collect();
        assert!(failed.contains(&locked.join("a.txt")), "{failed:?}");
        assert!(failed.contains(&locked));
        assert!(failed.contains(&root));
        assert_eq!(report.removed, 3);
        assert!(locked.join("a.txt").exists());
        assert!(!root.join("aaa.txt").exists());
        assert!(!root.join("zzz").exists());
    }
}
