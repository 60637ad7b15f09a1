use std::fmt;

use ocfl_types::{TypeError, VersionId};

use crate::manifest::Digest;

/// Which side of a mapping already holds conflicting content.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConflictKind {
    /// The logical path is already in the head state under another digest.
    Logical,
    /// The physical path is already in the manifest under another digest.
    Physical,
}

impl fmt::Display for ConflictKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConflictKind::Logical => f.write_str("logical"),
            ConflictKind::Physical => f.write_str("physical"),
        }
    }
}

/// Errors from inventory operations.
#[derive(Debug, thiserror::Error)]
pub enum InventoryError {
    /// The requested version is not part of the object.
    #[error("no version {version} present in object {object}")]
    NotFound { object: String, version: VersionId },

    /// Manifest and state disagree, or the inventory is otherwise malformed.
    #[error("inconsistent inventory for object {object}: {reason}")]
    Inconsistent { object: String, reason: String },

    /// A logical or physical path is already recorded with other content.
    #[error(
        "conflict in object {object}: cannot record '{logical_path}' at '{physical_path}' \
         with digest {attempted}; the {kind} path already has digest {existing}"
    )]
    Conflict {
        object: String,
        kind: ConflictKind,
        logical_path: String,
        physical_path: String,
        existing: Digest,
        attempted: Digest,
    },

    /// Malformed version name.
    #[error(transparent)]
    Version(#[from] TypeError),

    /// JSON encoding or decoding failure.
    #[error("inventory serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl InventoryError {
    pub(crate) fn inconsistent(object: &str, reason: impl Into<String>) -> Self {
        Self::Inconsistent {
            object: object.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result alias for inventory operations.
pub type InventoryResult<T> = Result<T, InventoryError>;
