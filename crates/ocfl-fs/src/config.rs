//! Driver configuration, loadable from TOML.
//!
//! ```toml
//! root = "/srv/ocfl"
//! object-layout = "hashed-n-tuple"
//! file-layout = "passthrough"
//! digest-algorithm = "sha512"
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use ocfl_crypto::DigestAlgorithm;
use serde::{Deserialize, Serialize};

use crate::error::{FsError, FsResult, IoContext};
use crate::layout::{HashedNTuple, Passthrough, PathGenerator, UrlEncoded};

/// How object IDs map to directories under the root.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ObjectLayout {
    /// No mapping: objects are found by scanning, and cannot be created.
    None,
    #[default]
    UrlEncoded,
    HashedNTuple,
}

impl ObjectLayout {
    pub fn generator(self) -> Option<Arc<dyn PathGenerator>> {
        match self {
            ObjectLayout::None => None,
            ObjectLayout::UrlEncoded => Some(Arc::new(UrlEncoded)),
            ObjectLayout::HashedNTuple => Some(Arc::new(HashedNTuple::default())),
        }
    }
}

/// How logical paths map to paths under a version's content directory.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FileLayout {
    /// No mapping: sessions are read-only.
    None,
    #[default]
    Passthrough,
}

impl FileLayout {
    pub fn generator(self) -> Option<Arc<dyn PathGenerator>> {
        match self {
            FileLayout::None => None,
            FileLayout::Passthrough => Some(Arc::new(Passthrough)),
        }
    }
}

/// Configuration of an [`FsDriver`](crate::FsDriver).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct FsConfig {
    /// OCFL root directory. Without one only physical paths can be walked.
    pub root: Option<PathBuf>,
    pub object_layout: ObjectLayout,
    pub file_layout: FileLayout,
    /// Digest algorithm for new objects.
    pub digest_algorithm: DigestAlgorithm,
}

impl FsConfig {
    /// Default configuration rooted at `root`.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
            ..Self::default()
        }
    }

    pub fn from_toml_str(s: &str) -> FsResult<Self> {
        let config: Self = toml::from_str(s).map_err(|e| FsError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> FsResult<Self> {
        let text = std::fs::read_to_string(path).at(path)?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> FsResult<()> {
        if !self.digest_algorithm.is_supported() {
            return Err(FsError::Config(format!(
                "unsupported digest algorithm '{}'",
                self.digest_algorithm
            )));
        }
        Ok(())
    }
}
