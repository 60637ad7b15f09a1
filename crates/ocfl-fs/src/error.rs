use std::io;
use std::path::{Path, PathBuf};

use ocfl_crypto::DigestError;
use ocfl_inventory::InventoryError;
use ocfl_types::{EntityType, TypeError, VersionId};

/// Errors from the filesystem driver.
#[derive(Debug, thiserror::Error)]
pub enum FsError {
    /// An entity that should exist does not.
    #[error("{expected} not found: {what}")]
    NotFound { what: String, expected: EntityType },

    /// Crawling upward never reached a directory with the right marker.
    #[error("no {expected} found at or above {}", path.display())]
    NoRootFound { path: PathBuf, expected: EntityType },

    /// The session cannot write yet (read-only, or missing path generators).
    #[error("session not ready for writing: {reason}")]
    NotReady { reason: String },

    /// The write targets a version that is no longer the head.
    #[error("cannot write version {target}: object head is {head}")]
    VersionConflict { target: VersionId, head: VersionId },

    /// The session was already committed.
    #[error("session is closed")]
    Closed,

    #[error("{} is not a usable OCFL root: {reason}", path.display())]
    InvalidRoot { path: PathBuf, reason: String },

    #[error("invalid path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Directory traversal failed, including symlink loops.
    #[error("directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),

    #[error(transparent)]
    Inventory(#[from] InventoryError),

    #[error(transparent)]
    Digest(#[from] DigestError),

    #[error(transparent)]
    Type(#[from] TypeError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("session lock poisoned")]
    LockPoisoned,
}

impl FsError {
    pub(crate) fn not_found(what: impl Into<String>, expected: EntityType) -> Self {
        Self::NotFound {
            what: what.into(),
            expected,
        }
    }

    /// Returns `true` for lookups that found nothing, as opposed to failures.
    pub fn is_not_found(&self) -> bool {
        match self {
            FsError::NotFound { .. } | FsError::NoRootFound { .. } => true,
            FsError::Io { source, .. } => source.kind() == io::ErrorKind::NotFound,
            FsError::Inventory(InventoryError::NotFound { .. }) => true,
            _ => false,
        }
    }
}

/// Attach the path an I/O operation was working on.
pub(crate) trait IoContext<T> {
    fn at(self, path: &Path) -> FsResult<T>;
}

impl<T> IoContext<T> for io::Result<T> {
    fn at(self, path: &Path) -> FsResult<T> {
        self.map_err(|source| FsError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Result alias for filesystem driver operations.
pub type FsResult<T> = Result<T, FsError>;
