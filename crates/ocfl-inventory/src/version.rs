use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use crate::manifest::Manifest;

/// The author of a version.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub address: String,
}

impl User {
    pub fn new(name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
        }
    }
}

/// One committed snapshot of an object.
///
/// `state` maps content digests to the *logical* paths that had that content
/// in this version.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Version {
    pub created: DateTime<Utc>,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub user: User,
    #[serde(default)]
    pub state: Manifest,
}

impl Version {
    /// An empty version created now.
    pub fn new() -> Self {
        Self::with_state(Manifest::new())
    }

    /// A version created now with the given state.
    pub fn with_state(state: Manifest) -> Self {
        Self {
            created: truncate_to_millis(Utc::now()),
            message: String::new(),
            user: User::default(),
            state,
        }
    }

    /// Number of logical files in this version.
    pub fn file_count(&self) -> usize {
        self.state.values().map(Vec::len).sum()
    }
}

impl Default for Version {
    fn default() -> Self {
        Self::new()
    }
}

/// Inventory timestamps carry millisecond precision so that they survive a
/// serialization round trip unchanged.
pub fn truncate_to_millis(t: DateTime<Utc>) -> DateTime<Utc> {
    t.trunc_subsecs(3)
}
