//! The [`Inventory`] structure and its incremental update operations.
//!
//! An inventory is read, modified in memory by an object session, and written
//! back whole. Lookups that the update path needs on every call (logical path
//! → digest in the head version, physical path → digest in the manifest) are
//! cached in lazily built indexes; every mutating method keeps them current.

use std::collections::{BTreeMap, HashMap};
use std::io::{Read, Write};

use ocfl_crypto::DigestAlgorithm;
use ocfl_types::VersionId;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ConflictKind, InventoryError, InventoryResult};
use crate::file::{select_physical_path, File};
use crate::manifest::{append_path, reverse_index, Digest, Fixity, Manifest};
use crate::version::Version;

/// File name of an inventory inside an object or version directory.
pub const INVENTORY_FILE: &str = "inventory.json";

/// Value of the inventory `type` field.
pub const INVENTORY_TYPE: &str = "https://ocfl.io/1.0/spec/#inventory";

/// Path → digest lookups, built on first use.
#[derive(Clone, Debug, Default)]
struct PathIndex {
    /// Logical paths of the head version.
    state: Option<HashMap<String, Digest>>,
    /// Physical paths of the manifest.
    manifest: Option<HashMap<String, Digest>>,
}

/// One OCFL object's inventory.
///
/// Fields are public for reading. Code that edits `head`, `manifest` or a
/// version's `state` directly must call [`Inventory::reindex`] before using
/// the update methods again.
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Inventory {
    pub id: String,
    #[serde(rename = "type")]
    pub inventory_type: String,
    pub digest_algorithm: DigestAlgorithm,
    pub head: VersionId,
    pub manifest: Manifest,
    pub versions: BTreeMap<VersionId, Version>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixity: Option<Fixity>,
    #[serde(skip)]
    index: PathIndex,
}

impl PartialEq for Inventory {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.inventory_type == other.inventory_type
            && self.digest_algorithm == other.digest_algorithm
            && self.head == other.head
            && self.manifest == other.manifest
            && self.versions == other.versions
            && self.fixity == other.fixity
    }
}

impl Eq for Inventory {}

impl std::fmt::Debug for Inventory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Inventory")
            .field("id", &self.id)
            .field("digest_algorithm", &self.digest_algorithm)
            .field("head", &self.head)
            .field("manifest", &self.manifest.len())
            .field("versions", &self.versions.len())
            .finish()
    }
}

impl Inventory {
    /// A fresh inventory for `id`: sha512 digests and a single empty `v1`.
    pub fn new(id: impl Into<String>) -> Self {
        Self::with_algorithm(id, DigestAlgorithm::sha512())
    }

    /// A fresh inventory using the given digest algorithm.
    pub fn with_algorithm(id: impl Into<String>, algorithm: DigestAlgorithm) -> Self {
        let head = VersionId::first();
        let mut versions = BTreeMap::new();
        versions.insert(head.clone(), Version::new());
        Self {
            id: id.into(),
            inventory_type: INVENTORY_TYPE.to_string(),
            digest_algorithm: algorithm,
            head,
            manifest: Manifest::new(),
            versions,
            fixity: None,
            index: PathIndex::default(),
        }
    }

    // ---------------------------------------------------------------
    // Serialization
    // ---------------------------------------------------------------

    pub fn from_reader<R: Read>(reader: R) -> InventoryResult<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn from_slice(bytes: &[u8]) -> InventoryResult<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }

    pub fn from_json(json: &str) -> InventoryResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize as pretty-printed JSON with a trailing newline.
    pub fn to_json_vec(&self) -> InventoryResult<Vec<u8>> {
        let mut bytes = serde_json::to_vec_pretty(self)?;
        bytes.push(b'\n');
        Ok(bytes)
    }

    pub fn to_json(&self) -> InventoryResult<String> {
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        Ok(json)
    }

    pub fn to_writer<W: Write>(&self, mut writer: W) -> InventoryResult<()> {
        let bytes = self.to_json_vec()?;
        writer
            .write_all(&bytes)
            .map_err(|e| InventoryError::Serialization(serde_json::Error::io(e)))
    }

    // ---------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------

    /// The version named `version`.
    pub fn version(&self, version: &VersionId) -> InventoryResult<&Version> {
        self.versions
            .get(version)
            .ok_or_else(|| InventoryError::NotFound {
                object: self.id.clone(),
                version: version.clone(),
            })
    }

    /// The head version. Missing head is an inconsistency, not a lookup miss.
    pub fn head_version(&self) -> InventoryResult<&Version> {
        self.versions.get(&self.head).ok_or_else(|| {
            InventoryError::inconsistent(&self.id, format!("head {} has no version entry", self.head))
        })
    }

    /// Every logical file of `version`, ordered by digest then logical path.
    ///
    /// Each file's physical path is chosen among the manifest paths of its
    /// digest, preferring content stored by `version` or the latest version
    /// before it.
    pub fn files(&self, version: &VersionId) -> InventoryResult<Vec<File>> {
        let state = &self.version(version)?.state;

        let fixity_index: Vec<(&DigestAlgorithm, HashMap<&str, &Digest>)> = self
            .fixity
            .iter()
            .flatten()
            .map(|(alg, map)| {
                let index = map
                    .iter()
                    .flat_map(|(digest, paths)| paths.iter().map(move |p| (p.as_str(), digest)))
                    .collect();
                (alg, index)
            })
            .collect();

        let mut files = Vec::with_capacity(state.len());
        for (digest, logical_paths) in state {
            let candidates = self.manifest.get(digest).map(Vec::as_slice).unwrap_or_default();
            let physical = select_physical_path(candidates, version).ok_or_else(|| {
                InventoryError::inconsistent(
                    &self.id,
                    format!("digest {} of version {version} has no manifest entry", digest.short()),
                )
            })?;

            let fixity: BTreeMap<DigestAlgorithm, Digest> = fixity_index
                .iter()
                .filter_map(|(alg, index)| {
                    index.get(physical).map(|d| ((*alg).clone(), (*d).clone()))
                })
                .collect();

            let mut sorted = logical_paths.clone();
            sorted.sort();
            for logical_path in sorted {
                files.push(File {
                    version: version.clone(),
                    logical_path,
                    physical_path: physical.to_string(),
                    digest: digest.clone(),
                    fixity: fixity.clone(),
                });
            }
        }
        Ok(files)
    }

    /// The logical file at `logical_path` in `version`, if present.
    pub fn file(&self, version: &VersionId, logical_path: &str) -> InventoryResult<Option<File>> {
        Ok(self
            .files(version)?
            .into_iter()
            .find(|f| f.logical_path == logical_path))
    }

    /// The manifest digest recorded for an object-relative physical path.
    pub fn digest_for_physical(&self, physical_path: &str) -> Option<&Digest> {
        self.manifest
            .iter()
            .find(|(_, paths)| paths.iter().any(|p| p == physical_path))
            .map(|(digest, _)| digest)
    }

    /// Versions whose logical state contains `digest`, oldest first.
    pub fn versions_with(&self, digest: &Digest) -> impl Iterator<Item = (&VersionId, &Version)> + '_ {
        let digest = digest.clone();
        self.versions
            .iter()
            .filter(move |(_, v)| v.state.contains_key(&digest))
    }

    // ---------------------------------------------------------------
    // Updates
    // ---------------------------------------------------------------

    /// Drop the cached lookups after editing fields directly.
    pub fn reindex(&mut self) {
        self.index = PathIndex::default();
    }

    /// Check whether `logical_path` → `physical_path` with `digest` could be
    /// added to the head version without changing recorded content.
    pub fn check_add(&mut self, logical_path: &str, physical_path: &str, digest: &Digest) -> InventoryResult<()> {
        self.build_index()?;

        let existing_logical = self.indexed_logical(logical_path);
        if let Some(existing) = existing_logical.filter(|d| *d != digest) {
            return Err(self.conflict(ConflictKind::Logical, logical_path, physical_path, existing, digest));
        }

        let existing_physical = self.indexed_physical(physical_path);
        if let Some(existing) = existing_physical.filter(|d| *d != digest) {
            return Err(self.conflict(ConflictKind::Physical, logical_path, physical_path, existing, digest));
        }
        Ok(())
    }

    /// Record `logical_path` in the head state and `physical_path` in the
    /// manifest under `digest`.
    ///
    /// Re-adding an identical mapping is a no-op; mapping either path to a
    /// different digest fails with [`InventoryError::Conflict`] and leaves
    /// the inventory unchanged.
    pub fn add_file(&mut self, logical_path: &str, physical_path: &str, digest: &Digest) -> InventoryResult<()> {
        self.check_add(logical_path, physical_path, digest)?;

        if self.indexed_logical(logical_path).is_none() {
            let version = self.head_version_mut()?;
            append_path(&mut version.state, digest, logical_path);
            self.state_index_mut()
                .insert(logical_path.to_string(), digest.clone());
        }

        if self.indexed_physical(physical_path).is_none() {
            append_path(&mut self.manifest, digest, physical_path);
            self.manifest_index_mut()
                .insert(physical_path.to_string(), digest.clone());
        }

        debug!(
            object = %self.id,
            head = %self.head,
            logical = logical_path,
            physical = physical_path,
            digest = digest.short(),
            "recorded file"
        );
        Ok(())
    }

    /// Add a logical path for content already in the manifest.
    pub fn add_logical_path(&mut self, logical_path: &str, digest: &Digest) -> InventoryResult<()> {
        if !self.manifest.get(digest).is_some_and(|paths| !paths.is_empty()) {
            return Err(InventoryError::inconsistent(
                &self.id,
                format!("digest {} is not in the manifest", digest.short()),
            ));
        }
        self.build_index()?;

        if let Some(existing) = self.indexed_logical(logical_path) {
            if existing == digest {
                return Ok(());
            }
            let existing = existing.clone();
            return Err(self.conflict(ConflictKind::Logical, logical_path, "", &existing, digest));
        }

        let version = self.head_version_mut()?;
        append_path(&mut version.state, digest, logical_path);
        self.state_index_mut()
            .insert(logical_path.to_string(), digest.clone());
        Ok(())
    }

    /// Remove `logical_path` from the head state, returning the digest it
    /// had. Manifest entries are kept.
    pub fn remove_logical_path(&mut self, logical_path: &str) -> InventoryResult<Option<Digest>> {
        self.build_index()?;
        let Some(digest) = self.state_index_mut().remove(logical_path) else {
            return Ok(None);
        };

        let version = self.head_version_mut()?;
        if let Some(paths) = version.state.get_mut(&digest) {
            paths.retain(|p| p != logical_path);
            if paths.is_empty() {
                version.state.remove(&digest);
            }
        }
        Ok(Some(digest))
    }

    /// Append a new head version whose state is a copy of the current head.
    ///
    /// The new version is stamped with the current time and empty metadata;
    /// the caller fills in message and user at commit.
    pub fn stage_next_version(&mut self) -> InventoryResult<VersionId> {
        let padding = self.versions.keys().next().and_then(VersionId::padding);
        let next = VersionId::from_number(self.head.number()? + 1, padding)?;
        let state = self.head_version()?.state.clone();

        self.versions.insert(next.clone(), Version::with_state(state));
        self.head = next.clone();
        // The head changed; the state index describes the old head.
        self.index.state = None;

        debug!(object = %self.id, head = %next, "staged next version");
        Ok(next)
    }

    // ---------------------------------------------------------------
    // Internal helpers
    // ---------------------------------------------------------------

    fn build_index(&mut self) -> InventoryResult<()> {
        if self.index.state.is_none() {
            let state = &self.head_version()?.state;
            let index = reverse_index(state).map_err(|path| {
                InventoryError::inconsistent(
                    &self.id,
                    format!("logical path '{path}' listed under two digests in {}", self.head),
                )
            })?;
            self.index.state = Some(index);
        }
        if self.index.manifest.is_none() {
            let index = reverse_index(&self.manifest).map_err(|path| {
                InventoryError::inconsistent(
                    &self.id,
                    format!("physical path '{path}' listed under two digests"),
                )
            })?;
            self.index.manifest = Some(index);
        }
        Ok(())
    }

    fn head_version_mut(&mut self) -> InventoryResult<&mut Version> {
        let id = &self.id;
        let head = &self.head;
        self.versions.get_mut(head).ok_or_else(|| {
            InventoryError::inconsistent(id, format!("head {head} has no version entry"))
        })
    }

    fn indexed_logical(&self, logical_path: &str) -> Option<&Digest> {
        self.index.state.as_ref()?.get(logical_path)
    }

    fn indexed_physical(&self, physical_path: &str) -> Option<&Digest> {
        self.index.manifest.as_ref()?.get(physical_path)
    }

    fn state_index_mut(&mut self) -> &mut HashMap<String, Digest> {
        self.index.state.get_or_insert_with(HashMap::new)
    }

    fn manifest_index_mut(&mut self) -> &mut HashMap<String, Digest> {
        self.index.manifest.get_or_insert_with(HashMap::new)
    }

    fn conflict(
        &self,
        kind: ConflictKind,
        logical_path: &str,
        physical_path: &str,
        existing: &Digest,
        attempted: &Digest,
    ) -> InventoryError {
        InventoryError::Conflict {
            object: self.id.clone(),
            kind,
            logical_path: logical_path.to_string(),
            physical_path: physical_path.to_string(),
            existing: existing.clone(),
            attempted: attempted.clone(),
        }
    }
}
