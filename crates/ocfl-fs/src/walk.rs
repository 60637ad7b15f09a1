//! The repository walker.
//!
//! Above object level the walker descends real directories; at an object
//! root it switches to the object's inventory and emits the object, its
//! versions and their files from the manifest instead of the directory tree.

use std::path::Path;
use std::sync::Arc;

use ocfl_types::{EntityRef, EntityType, Select};
use tracing::debug;
use walkdir::WalkDir;

use crate::error::{FsError, FsResult};
use crate::marker::is_root;
use crate::resolve::{find_root, read_inventory, slash_path};

/// A bounded set of entities: everything under `start` that matches
/// `desired`.
#[derive(Clone, Debug)]
pub struct Scope {
    root: Arc<EntityRef>,
    start: EntityRef,
    desired: Select,
}

impl Scope {
    /// Scope everything under `start`. Fails if no OCFL root encloses it.
    pub fn new(start: EntityRef, desired: Select) -> FsResult<Self> {
        let root = find_root(&start, EntityType::Root)?;
        Ok(Self {
            root: Arc::new(root),
            start,
            desired,
        })
    }

    pub fn start(&self) -> &EntityRef {
        &self.start
    }

    /// Walk the scope, invoking `f` on every matching entity.
    ///
    /// Order is unspecified. An error from `f` ends the walk and is returned
    /// as is; a missing or corrupt inventory is fatal.
    pub fn walk<E, F>(&self, mut f: F) -> Result<(), E>
    where
        F: FnMut(EntityRef) -> Result<(), E>,
        E: From<FsError>,
    {
        let mut node = self.start.clone();
        if node.kind < EntityType::Object {
            node = find_root(&node, EntityType::Object)?;
        }

        if node.kind == EntityType::Root && self.contains(&node) {
            f(node.clone())?;
        }
        if self.desired.kind == EntityType::Root {
            return Ok(());
        }

        if node.kind == EntityType::Object {
            return self.walk_object(&node.addr, &mut f);
        }
        self.walk_directories(&node.addr, &mut f)
    }

    /// Collect every matching entity.
    pub fn collect(&self) -> FsResult<Vec<EntityRef>> {
        let mut found = Vec::new();
        self.walk(|entity| {
            found.push(entity);
            Ok::<(), FsError>(())
        })?;
        Ok(found)
    }

    fn walk_directories<E, F>(&self, start: &Path, f: &mut F) -> Result<(), E>
    where
        F: FnMut(EntityRef) -> Result<(), E>,
        E: From<FsError>,
    {
        let mut entries = WalkDir::new(start).follow_links(true).into_iter();

        while let Some(entry) = entries.next() {
            let entry = entry.map_err(FsError::from)?;
            if !entry.file_type().is_dir() {
                continue;
            }
            let path = entry.path();

            if is_root(path, EntityType::Object)?.is_some() {
                entries.skip_current_dir();
                if self.desired.kind != EntityType::Intermediate {
                    self.walk_object(path, f)?;
                }
                continue;
            }

            if path != self.root.addr && self.desired.matches(EntityType::Intermediate) {
                let id = path
                    .strip_prefix(&self.root.addr)
                    .map(slash_path)
                    .unwrap_or_else(|_| path.display().to_string());
                let intermediate =
                    EntityRef::new(EntityType::Intermediate, id, path).with_parent(Arc::clone(&self.root));
                if self.contains(&intermediate) {
                    f(intermediate)?;
                }
            }
        }
        Ok(())
    }

    fn walk_object<E, F>(&self, path: &Path, f: &mut F) -> Result<(), E>
    where
        F: FnMut(EntityRef) -> Result<(), E>,
        E: From<FsError>,
    {
        let inv = read_inventory(path)?;
        debug!(object = %inv.id, path = %path.display(), "walking object");

        let object = Arc::new(
            EntityRef::new(EntityType::Object, inv.id.as_str(), path).with_parent(Arc::clone(&self.root)),
        );
        if self.contains(&object) {
            f((*object).clone())?;
        }

        let wants_versions = matches!(
            self.desired.kind,
            EntityType::Any | EntityType::Version | EntityType::File
        );
        if !wants_versions {
            return Ok(());
        }
        let wants_files = matches!(self.desired.kind, EntityType::Any | EntityType::File);

        // Walks started at a version or file only need that version or file.
        let target_version = match self.start.kind {
            EntityType::Version | EntityType::File => self.start.version_id(),
            _ => None,
        };
        let target_file = (self.start.kind == EntityType::File).then_some(self.start.id.as_str());

        for vid in inv.versions.keys() {
            if self.desired.head && *vid != inv.head {
                continue;
            }
            if target_version.is_some_and(|t| vid.as_str() != t) {
                continue;
            }

            let version = Arc::new(
                EntityRef::new(EntityType::Version, vid.as_str(), path.join(vid.as_str()))
                    .with_parent(Arc::clone(&object)),
            );
            if self.contains(&version) {
                f((*version).clone())?;
            }
            if !wants_files {
                continue;
            }

            for file in inv.files(vid).map_err(FsError::from)? {
                if target_file.is_some_and(|t| file.logical_path != t) {
                    continue;
                }
                let entity = EntityRef::new(EntityType::File, file.logical_path, path.join(&file.physical_path))
                    .with_parent(Arc::clone(&version));
                if self.contains(&entity) {
                    f(entity)?;
                }
            }
        }
        Ok(())
    }

    /// An entity is in scope if its type is desired and it is the start
    /// entity or a descendant of it. Walks from a root or intermediate node
    /// are already bounded by the directory walk.
    fn contains(&self, entity: &EntityRef) -> bool {
        if !self.desired.matches(entity.kind) {
            return false;
        }
        if self.start.kind >= EntityType::Intermediate {
            return true;
        }
        let start_coords = self.start.coords();
        entity
            .lineage()
            .any(|e| e.kind == self.start.kind && e.coords() == start_coords)
    }
}
