//! Options and metadata passed through the [`Driver`](crate::Driver) and
//! [`Session`](crate::Session) traits.

use chrono::{DateTime, Utc};
use ocfl_types::VersionId;

/// Which version a session targets.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum VersionSelector {
    /// The current head, read-only.
    #[default]
    Head,
    /// A new version staged on top of the head.
    New,
    /// A specific existing version, read-only.
    Named(VersionId),
}

/// How to open an object.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OpenOptions {
    /// Create the object if it does not exist.
    pub create: bool,
    pub version: VersionSelector,
}

impl OpenOptions {
    /// Read the head version of an existing object.
    pub fn read() -> Self {
        Self::default()
    }

    /// Stage a new version of an existing object.
    pub fn new_version() -> Self {
        Self {
            create: false,
            version: VersionSelector::New,
        }
    }

    /// Stage a new version, creating the object if it does not exist.
    pub fn create() -> Self {
        Self {
            create: true,
            version: VersionSelector::New,
        }
    }

    /// Read a specific version.
    pub fn at(version: impl Into<VersionId>) -> Self {
        Self {
            create: false,
            version: VersionSelector::Named(version.into()),
        }
    }
}

/// Metadata stamped on a version at commit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommitInfo {
    /// Name of the committing user.
    pub name: String,
    /// Address (mail, URI) of the committing user.
    pub address: String,
    pub message: String,
    pub date: DateTime<Utc>,
}

impl Default for CommitInfo {
    fn default() -> Self {
        Self {
            name: String::new(),
            address: String::new(),
            message: String::new(),
            date: Utc::now(),
        }
    }
}
