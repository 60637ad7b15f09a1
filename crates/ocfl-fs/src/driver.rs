//! The filesystem driver facade.

use std::path::Path;
use std::sync::Arc;

use ocfl_crypto::DigestAlgorithm;
use ocfl_inventory::{Inventory, InventoryError};
use ocfl_types::{EntityRef, EntityType, Select, VersionId};
use tracing::debug;

use crate::config::FsConfig;
use crate::error::{FsError, FsResult};
use crate::layout::PathGenerator;
use crate::marker::is_root;
use crate::resolve::{absolute, read_inventory, resolve};
use crate::session::FsSession;
use crate::traits::{Driver, Walker};
use crate::types::OpenOptions;
use crate::walk::Scope;

/// Walks and opens objects in one OCFL root on the local filesystem.
///
/// Without an object path generator, objects are located by scanning the
/// root and new objects cannot be created. Without a file path generator,
/// every session is read-only.
pub struct FsDriver {
    root: Option<Arc<EntityRef>>,
    object_paths: Option<Arc<dyn PathGenerator>>,
    file_paths: Option<Arc<dyn PathGenerator>>,
    algorithm: DigestAlgorithm,
}

impl std::fmt::Debug for FsDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FsDriver")
            .field("root", &self.root.as_ref().map(|r| r.addr.clone()))
            .field("object_paths", &self.object_paths.is_some())
            .field("file_paths", &self.file_paths.is_some())
            .field("algorithm", &self.algorithm)
            .finish()
    }
}

impl FsDriver {
    /// Build a driver from `config`. A configured root must already carry
    /// the root marker.
    pub fn new(config: FsConfig) -> FsResult<Self> {
        config.validate()?;
        let root = match &config.root {
            None => None,
            Some(path) => {
                let abs = absolute(path)?;
                if is_root(&abs, EntityType::Root)?.is_none() {
                    return Err(FsError::InvalidRoot {
                        path: abs,
                        reason: "not an OCFL storage root".into(),
                    });
                }
                Some(Arc::new(EntityRef::root(abs)))
            }
        };
        debug!(root = ?root.as_ref().map(|r| r.addr.display().to_string()), "opened driver");

        Ok(Self {
            root,
            object_paths: config.object_layout.generator(),
            file_paths: config.file_layout.generator(),
            algorithm: config.digest_algorithm,
        })
    }

    /// Replace the object ID → directory mapping.
    pub fn with_object_paths(mut self, generator: impl PathGenerator + 'static) -> Self {
        self.object_paths = Some(Arc::new(generator));
        self
    }

    /// Replace the logical path → content path mapping.
    pub fn with_file_paths(mut self, generator: impl PathGenerator + 'static) -> Self {
        self.file_paths = Some(Arc::new(generator));
        self
    }

    pub fn root(&self) -> Option<&EntityRef> {
        self.root.as_deref()
    }

    pub(crate) fn root_ref(&self) -> FsResult<Arc<EntityRef>> {
        self.root
            .clone()
            .ok_or_else(|| FsError::Config("no OCFL root configured".into()))
    }

    pub(crate) fn object_paths(&self) -> Option<Arc<dyn PathGenerator>> {
        self.object_paths.clone()
    }

    pub(crate) fn file_paths(&self) -> Option<Arc<dyn PathGenerator>> {
        self.file_paths.clone()
    }

    pub(crate) fn algorithm(&self) -> &DigestAlgorithm {
        &self.algorithm
    }

    /// Find object `id` and read its inventory. `Ok(None)` when there is no
    /// such object.
    pub(crate) fn locate_object(&self, id: &str) -> FsResult<Option<(EntityRef, Inventory)>> {
        let root = self.root_ref()?;

        let dir = match &self.object_paths {
            Some(generator) => {
                let dir = root.addr.join(generator.generate(id).trim_matches('/'));
                if is_root(&dir, EntityType::Object)?.is_none() {
                    return Ok(None);
                }
                dir
            }
            None => {
                let objects = Scope::new((*root).clone(), Select::kind(EntityType::Object))?.collect()?;
                debug!(object = id, scanned = objects.len(), "located object by scanning");
                match objects.into_iter().find(|o| o.id == id) {
                    Some(object) => object.addr,
                    None => return Ok(None),
                }
            }
        };

        let inventory = read_inventory(&dir)?;
        if inventory.id != id {
            return Err(FsError::Inventory(InventoryError::Inconsistent {
                object: id.to_string(),
                reason: format!("{} holds object '{}'", dir.display(), inventory.id),
            }));
        }
        let object = EntityRef::new(EntityType::Object, id, dir).with_parent(root);
        Ok(Some((object, inventory)))
    }

    /// The entity named by logical coordinates `[object, version, path]`.
    fn logical_start(&self, coords: &[&str]) -> FsResult<EntityRef> {
        if coords.len() > 3 {
            return Err(FsError::InvalidPath {
                path: coords.join(" "),
                reason: "expected at most object, version and logical path".into(),
            });
        }

        let (object, inventory) = self
            .locate_object(coords[0])?
            .ok_or_else(|| FsError::not_found(coords[0], EntityType::Object))?;
        let Some(version_name) = coords.get(1) else {
            return Ok(object);
        };

        let object_addr = object.addr.clone();
        let version_id = VersionId::new(*version_name);
        if !inventory.versions.contains_key(&version_id) {
            return Err(FsError::not_found(
                format!("{version_id} of object {}", object.id),
                EntityType::Version,
            ));
        }
        let version = EntityRef::new(EntityType::Version, version_id.as_str(), object.addr.join(version_id.as_str()))
            .with_parent(Arc::new(object));
        let Some(logical) = coords.get(2) else {
            return Ok(version);
        };

        let file = inventory
            .file(&version_id, logical)?
            .ok_or_else(|| FsError::not_found(format!("{logical} in {version_id} of {}", inventory.id), EntityType::File))?;
        let addr = object_addr.join(&file.physical_path);
        Ok(EntityRef::new(EntityType::File, file.logical_path, addr).with_parent(Arc::new(version)))
    }
}

impl Walker for FsDriver {
    fn walk<E, F>(&self, desired: Select, loc: &[&str], mut f: F) -> Result<(), E>
    where
        F: FnMut(EntityRef) -> Result<(), E>,
        E: From<FsError>,
    {
        match loc {
            [] => {
                let root = self.root_ref()?;
                Scope::new((*root).clone(), desired)?.walk(f)
            }
            [path] if Path::new(path).exists() => {
                for start in resolve(Path::new(path))?.refs {
                    Scope::new(start, desired)?.walk(&mut f)?;
                }
                Ok(())
            }
            coords => {
                let start = self.logical_start(coords)?;
                Scope::new(start, desired)?.walk(f)
            }
        }
    }
}

impl Driver for FsDriver {
    type Session = FsSession;

    fn open(&self, id: &str, options: OpenOptions) -> FsResult<FsSession> {
        FsSession::open(self, id, options)
    }
}
