//! Physical path → logical entity resolution.
//!
//! A path inside an OCFL root is one of: the root itself, an intermediate
//! directory, an object root, a version directory, or a content file. A
//! content file may back several logical files at once (the same content
//! carried through several versions, or stored once under several names), so
//! resolution yields a list of entities.

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use ocfl_inventory::{Inventory, InventoryError, INVENTORY_FILE};
use ocfl_types::{EntityRef, EntityType, VersionId};
use tracing::{debug, info};

use crate::error::{FsError, FsResult, IoContext};
use crate::marker::{is_root, write_marker};

/// The entities a physical path resolves to, plus the inventory of the
/// enclosing object when there is one.
#[derive(Clone, Debug)]
pub struct Resolved {
    pub refs: Vec<EntityRef>,
    pub inventory: Option<Inventory>,
}

/// Absolute, lexically normalized form of `path`.
pub(crate) fn absolute(path: &Path) -> FsResult<PathBuf> {
    let abs = std::path::absolute(path).at(path)?;
    let mut out = PathBuf::new();
    for component in abs.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other),
        }
    }
    Ok(out)
}

/// `/`-joined form of a relative path.
pub(crate) fn slash_path(rel: &Path) -> String {
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// The first directory at or above `path` carrying the marker for `kind`.
fn nearest_root(path: &Path, kind: EntityType) -> FsResult<Option<EntityRef>> {
    for dir in path.ancestors() {
        if let Some(found) = is_root(dir, kind)? {
            return Ok(Some(EntityRef::new(found, "", dir)));
        }
    }
    Ok(None)
}

/// Crawl upward from the parent of `path` to the nearest directory carrying
/// the marker for `kind` (`Root`, `Object`, or `Any`).
pub fn crawl_for_root(path: &Path, kind: EntityType) -> FsResult<EntityRef> {
    let abs = absolute(path)?;
    let not_found = || FsError::NoRootFound {
        path: abs.clone(),
        expected: kind,
    };
    let parent = abs.parent().ok_or_else(not_found)?;
    nearest_root(parent, kind)?.ok_or_else(not_found)
}

/// The enclosing entity of `kind` for `entity`.
///
/// Uses the entity's lineage when it already holds one; otherwise crawls the
/// filesystem, which only works for OCFL roots.
pub fn find_root(entity: &EntityRef, kind: EntityType) -> FsResult<EntityRef> {
    if let Some(found) = entity.ancestor(kind) {
        return Ok(found.clone());
    }
    if kind == EntityType::Root {
        return crawl_for_root(&entity.addr, kind);
    }
    Err(FsError::not_found(
        format!("{kind} enclosing {}", entity.addr.display()),
        kind,
    ))
}

/// `path` itself if it is an OCFL root, else the nearest enclosing root.
pub fn locate_root(path: &Path) -> FsResult<PathBuf> {
    let abs = absolute(path)?;
    match nearest_root(&abs, EntityType::Root)? {
        Some(root) => Ok(root.addr),
        None => Err(FsError::NoRootFound {
            path: abs,
            expected: EntityType::Root,
        }),
    }
}

/// Initialize an OCFL root at `path`.
///
/// Creates the directory if needed. An existing root is left alone; any
/// other non-empty directory, or a non-directory, is refused.
pub fn init_root(path: &Path) -> FsResult<()> {
    match fs::metadata(path) {
        Ok(meta) if !meta.is_dir() => {
            return Err(FsError::InvalidRoot {
                path: path.to_path_buf(),
                reason: "not a directory".into(),
            })
        }
        Ok(_) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            fs::create_dir_all(path).at(path)?;
        }
        Err(e) => return Err(e).at(path),
    }

    if is_root(path, EntityType::Root)?.is_some() {
        debug!(path = %path.display(), "already an OCFL root");
        return Ok(());
    }

    if fs::read_dir(path).at(path)?.next().is_some() {
        return Err(FsError::InvalidRoot {
            path: path.to_path_buf(),
            reason: "directory is not empty".into(),
        });
    }

    write_marker(path, EntityType::Root)?;
    info!(path = %path.display(), "initialized OCFL root");
    Ok(())
}

/// Read and parse `inventory.json` from an object root (or version
/// directory).
pub fn read_inventory(dir: &Path) -> FsResult<Inventory> {
    let path = dir.join(INVENTORY_FILE);
    let bytes = fs::read(&path).at(&path)?;
    Inventory::from_slice(&bytes).map_err(|e| {
        FsError::Inventory(InventoryError::Inconsistent {
            object: dir.display().to_string(),
            reason: format!("cannot parse {}: {e}", path.display()),
        })
    })
}

/// Resolve a physical path to the entities it represents.
pub fn resolve(path: &Path) -> FsResult<Resolved> {
    let addr = absolute(path)?;
    match fs::metadata(&addr) {
        Ok(_) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(FsError::not_found(addr.display().to_string(), EntityType::Any))
        }
        Err(e) => return Err(e).at(&addr),
    }

    let mut base = nearest_root(&addr, EntityType::Any)?.ok_or_else(|| FsError::NoRootFound {
        path: addr.clone(),
        expected: EntityType::Root,
    })?;

    let mut inventory = None;
    if base.kind == EntityType::Object {
        let inv = read_inventory(&base.addr)?;
        base.id = inv.id.clone();
        let above = base.addr.parent().unwrap_or(&base.addr);
        let root = nearest_root(above, EntityType::Root)?.ok_or_else(|| FsError::NoRootFound {
            path: base.addr.clone(),
            expected: EntityType::Root,
        })?;
        base = base.with_parent(Arc::new(root));
        inventory = Some(inv);
    }

    if base.addr == addr {
        return Ok(Resolved {
            refs: vec![base],
            inventory,
        });
    }

    let rel = addr.strip_prefix(&base.addr).unwrap_or(&addr).to_path_buf();

    if base.kind == EntityType::Root {
        let intermediate = EntityRef::new(EntityType::Intermediate, slash_path(&rel), &addr)
            .with_parent(Arc::new(base));
        return Ok(Resolved {
            refs: vec![intermediate],
            inventory,
        });
    }

    let Some(inv) = inventory else {
        return Err(FsError::not_found(addr.display().to_string(), EntityType::Object));
    };
    let object = Arc::new(base);
    let version_id = rel
        .components()
        .next()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .unwrap_or_default();
    let version_addr = object.addr.join(&version_id);

    if version_addr == addr {
        if !inv.versions.contains_key(&VersionId::new(version_id.as_str())) {
            return Err(FsError::not_found(
                format!("{} in object {}", version_id, inv.id),
                EntityType::Version,
            ));
        }
        let version = EntityRef::new(EntityType::Version, version_id, version_addr).with_parent(object);
        return Ok(Resolved {
            refs: vec![version],
            inventory: Some(inv),
        });
    }

    let physical = slash_path(&rel);
    let digest = inv
        .digest_for_physical(&physical)
        .ok_or_else(|| FsError::not_found(format!("{physical} in the manifest of {}", inv.id), EntityType::File))?;

    let mut refs = Vec::new();
    for (vid, version) in inv.versions_with(digest) {
        let vref = Arc::new(
            EntityRef::new(EntityType::Version, vid.as_str(), object.addr.join(vid.as_str()))
                .with_parent(Arc::clone(&object)),
        );
        for logical in version.state.get(digest).into_iter().flatten() {
            refs.push(EntityRef::new(EntityType::File, logical.as_str(), &addr).with_parent(Arc::clone(&vref)));
        }
    }
    debug!(path = %addr.display(), entities = refs.len(), "resolved content file");

    Ok(Resolved {
        refs,
        inventory: Some(inv),
    })
}
