use std::borrow::Borrow;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

use ocfl_crypto::DigestAlgorithm;
use serde::{Deserialize, Serialize};

/// A content digest: lowercase hex, as used for manifest and state keys.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Digest(String);

impl Digest {
    /// Wrap a hex digest, normalizing it to lowercase.
    pub fn new(hex: impl Into<String>) -> Self {
        let mut hex = hex.into();
        hex.make_ascii_lowercase();
        Self(hex)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First 12 hex characters, for log output.
    pub fn short(&self) -> &str {
        self.0.get(..12).unwrap_or(&self.0)
    }
}

impl Borrow<str> for Digest {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({})", self.short())
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Digest → paths. Used both for the manifest (physical, object-relative
/// paths) and for version states (logical paths).
pub type Manifest = BTreeMap<Digest, Vec<String>>;

/// Supplementary digests: algorithm → digest → physical paths.
pub type Fixity = BTreeMap<DigestAlgorithm, Manifest>;

/// Reverse index path → digest over a [`Manifest`].
///
/// Fails with the offending path when the same path is listed under two
/// different digests.
pub(crate) fn reverse_index(map: &Manifest) -> Result<HashMap<String, Digest>, String> {
    let mut index = HashMap::with_capacity(map.len());
    for (digest, paths) in map {
        for path in paths {
            if let Some(previous) = index.insert(path.clone(), digest.clone()) {
                if previous != *digest {
                    return Err(path.clone());
                }
            }
        }
    }
    Ok(index)
}

/// Append `path` under `digest`, creating the entry if needed.
pub(crate) fn append_path(map: &mut Manifest, digest: &Digest, path: &str) {
    map.entry(digest.clone()).or_default().push(path.to_string());
}
