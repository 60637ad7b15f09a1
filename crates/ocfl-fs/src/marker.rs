//! Marker files ("namaste" files) that identify OCFL roots and object roots.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use ocfl_types::EntityType;

use crate::atomic::ManagedWrite;
use crate::error::{FsResult, IoContext};

/// Marker file placed directly inside an OCFL root.
pub const ROOT_MARKER: &str = "0=ocfl_1.0";
pub const ROOT_MARKER_CONTENT: &str = "ocfl_1.0\n";

/// Marker file placed directly inside an object root.
pub const OBJECT_MARKER: &str = "0=ocfl_object_1.0";
pub const OBJECT_MARKER_CONTENT: &str = "ocfl_object_1.0\n";

/// Directory under a version that holds its content files.
pub const CONTENT_DIR: &str = "content";

fn marker_for(kind: EntityType) -> Option<(&'static str, &'static str)> {
    match kind {
        EntityType::Root => Some((ROOT_MARKER, ROOT_MARKER_CONTENT)),
        EntityType::Object => Some((OBJECT_MARKER, OBJECT_MARKER_CONTENT)),
        _ => None,
    }
}

/// Test whether `path` is a directory carrying the marker for `kind`.
///
/// `kind` is `Root`, `Object`, or `Any` (either marker, root first); other
/// kinds never match. Returns the matching kind. A missing directory or
/// marker is `Ok(None)`; any other I/O failure is an error.
pub fn is_root(path: &Path, kind: EntityType) -> FsResult<Option<EntityType>> {
    if kind == EntityType::Any {
        if let Some(found) = is_root(path, EntityType::Root)? {
            return Ok(Some(found));
        }
        return is_root(path, EntityType::Object);
    }

    let Some((marker, _)) = marker_for(kind) else {
        return Ok(None);
    };

    match probe(path)? {
        Some(meta) if meta.is_dir() => {}
        _ => return Ok(None),
    }

    let found = probe(&path.join(marker))?.is_some_and(|meta| meta.is_file());
    Ok(found.then_some(kind))
}

fn probe(path: &Path) -> FsResult<Option<fs::Metadata>> {
    match fs::metadata(path) {
        Ok(meta) => Ok(Some(meta)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e).at(path),
    }
}

/// Durably write the marker for `kind` into `dir`.
pub fn write_marker(dir: &Path, kind: EntityType) -> FsResult<()> {
    let Some((marker, content)) = marker_for(kind) else {
        return Ok(());
    };
    let mut write = ManagedWrite::begin(dir.join(marker))?;
    write.write_all(content.as_bytes()).at(write.target())?;
    write.commit()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_markers() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        assert_eq!(is_root(root, EntityType::Any).unwrap(), None);

        write_marker(root, EntityType::Root).unwrap();
        assert_eq!(
            fs::read_to_string(root.join(ROOT_MARKER)).unwrap(),
            ROOT_MARKER_CONTENT
        );
        assert_eq!(is_root(root, EntityType::Root).unwrap(), Some(EntityType::Root));
        assert_eq!(is_root(root, EntityType::Any).unwrap(), Some(EntityType::Root));
        assert_eq!(is_root(root, EntityType::Object).unwrap(), None);

        let obj = root.join("obj");
        fs::create_dir(&obj).unwrap();
        write_marker(&obj, EntityType::Object).unwrap();
        assert_eq!(
            fs::read_to_string(obj.join(OBJECT_MARKER)).unwrap(),
            "ocfl_object_1.0\n"
        );
        assert_eq!(is_root(&obj, EntityType::Any).unwrap(), Some(EntityType::Object));
        assert_eq!(is_root(&obj, EntityType::Version).unwrap(), None);
    }

    #[test]
    fn absence_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(is_root(&dir.path().join("missing"), EntityType::Root).unwrap(), None);

        let file = dir.path().join("plain");
        fs::write(&file, "x").unwrap();
        assert_eq!(is_root(&file, EntityType::Root).unwrap(), None);
    }

    #[test]
    fn marker_must_be_a_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join(ROOT_MARKER)).unwrap();
        assert_eq!(is_root(dir.path(), EntityType::Root).unwrap(), None);
    }

    #[cfg(unix)]
    #[test]
    fn permission_errors_propagate() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let locked = dir.path().join("locked");
        fs::create_dir(&locked).unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        // Privileged users bypass permission bits; only check when denied.
        let denied = fs::metadata(locked.join(ROOT_MARKER))
            .is_err_and(|e| e.kind() == io::ErrorKind::PermissionDenied);
        let result = is_root(&locked, EntityType::Root);
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        if denied {
            assert!(result.is_err());
        }
    }
}
