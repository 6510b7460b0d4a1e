use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by `hostfs-core` operations.
///
/// Volume enumeration and best-effort deletion never fail as a whole; they
/// report what they skipped in their result types instead. The variants here
/// are for operations that have no meaningful partial result.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The process environment does not name a home directory.
    #[error("could not determine the home directory")]
    NoHomeDirectory,

    /// The path passed to a listing operation does not exist.
    #[error("path not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The path passed to a listing operation exists but is not a directory.
    #[error("not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    /// A volume identifier could not be turned into a display label.
    #[error("no label available for drive '{drive}': {reason}")]
    NoLabel {
        /// The identifier that was queried.
        drive: String,

        /// Why the label could not be produced.
        reason: String,
    },

    /// Any other operating system failure, tagged with the path involved.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl Error {
    /// Classifies an I/O error raised while opening `path` for listing.
    pub(crate) fn from_io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            io::ErrorKind::NotFound => Self::NotFound(path),
            io::ErrorKind::NotADirectory => Self::NotADirectory(path),
            _ => Self::Io { path, source },
        }
    }
}

/// A specialized `Result` type for `hostfs-core` operations.
pub type Result<T> = std::result::Result<T, Error>;
