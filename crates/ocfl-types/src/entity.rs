//! Entity references: typed nodes of the OCFL hierarchy.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Kind of OCFL entity, ordered by specificity: `Root` is the highest,
/// `File` the lowest. `Any` sorts below everything and is only meaningful as
/// a selector wildcard.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    #[default]
    Any,
    File,
    Version,
    Object,
    Intermediate,
    Root,
}

impl EntityType {
    /// Returns `true` for objects, intermediate nodes and roots.
    pub fn is_object_or_above(self) -> bool {
        self >= EntityType::Object
    }

    /// Returns `true` for the entities that make up logical coordinates.
    pub fn is_coordinate(self) -> bool {
        matches!(
            self,
            EntityType::Object | EntityType::Version | EntityType::File
        )
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityType::Any => "Any",
            EntityType::File => "File",
            EntityType::Version => "Version",
            EntityType::Object => "Object",
            EntityType::Intermediate => "Intermediate node",
            EntityType::Root => "Root",
        };
        f.write_str(name)
    }
}

impl FromStr for EntityType {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "any" => Ok(EntityType::Any),
            "file" => Ok(EntityType::File),
            "version" => Ok(EntityType::Version),
            "object" => Ok(EntityType::Object),
            "intermediate" | "intermediate node" => Ok(EntityType::Intermediate),
            "root" => Ok(EntityType::Root),
            _ => Err(TypeError::UnknownEntityType(s.to_string())),
        }
    }
}

/// Desired properties of entities produced by a walk.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Select {
    /// Desired entity type; `Any` accepts every type.
    pub kind: EntityType,
    /// Only versions and files of an object's head version.
    pub head: bool,
}

impl Select {
    pub fn kind(kind: EntityType) -> Self {
        Self { kind, head: false }
    }

    /// Restrict the selection to head versions.
    pub fn head_only(mut self) -> Self {
        self.head = true;
        self
    }

    pub fn matches(&self, kind: EntityType) -> bool {
        self.kind == EntityType::Any || self.kind == kind
    }
}

/// A single OCFL entity.
///
/// `parent` points at the next enclosing entity of a significant type:
/// intermediate directories collapse, so an object's parent is the OCFL root.
/// Chains are at most root → object → version → file, so ancestors are
/// shared behind an [`Arc`] rather than copied.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntityRef {
    /// Logical ID: object ID, version name, logical path, or the
    /// root-relative path of an intermediate node. Empty for roots.
    pub id: String,
    /// Physical address of the entity.
    pub addr: PathBuf,
    pub kind: EntityType,
    pub parent: Option<Arc<EntityRef>>,
}

impl EntityRef {
    pub fn new(kind: EntityType, id: impl Into<String>, addr: impl Into<PathBuf>) -> Self {
        Self {
            id: id.into(),
            addr: addr.into(),
            kind,
            parent: None,
        }
    }

    /// An OCFL root located at `addr`.
    pub fn root(addr: impl Into<PathBuf>) -> Self {
        Self::new(EntityType::Root, "", addr)
    }

    /// Attach a parent.
    pub fn with_parent(mut self, parent: Arc<EntityRef>) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn addr(&self) -> &Path {
        &self.addr
    }

    /// This entity followed by each of its ancestors, innermost first.
    pub fn lineage(&self) -> impl Iterator<Item = &EntityRef> {
        std::iter::successors(Some(self), |e| e.parent.as_deref())
    }

    /// The nearest entity of the given kind in this entity's lineage,
    /// including the entity itself.
    pub fn ancestor(&self, kind: EntityType) -> Option<&EntityRef> {
        self.lineage().find(|e| e.kind == kind)
    }

    /// Logical coordinates `[object ID, version ID, logical path]`, with only
    /// the levels that are defined for this entity.
    pub fn coords(&self) -> Vec<String> {
        let mut coords: Vec<String> = self
            .lineage()
            .filter(|e| e.kind.is_coordinate())
            .map(|e| e.id.clone())
            .collect();
        coords.reverse();
        coords
    }

    pub fn object_id(&self) -> Option<&str> {
        self.ancestor(EntityType::Object).map(|e| e.id.as_str())
    }

    pub fn version_id(&self) -> Option<&str> {
        self.ancestor(EntityType::Version).map(|e| e.id.as_str())
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let coords = self.coords();
        if coords.is_empty() {
            write!(f, "{} at {}", self.kind, self.addr.display())
        } else {
            write!(f, "{} {}", self.kind, coords.join(" "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file_ref() -> EntityRef {
        let root = Arc::new(EntityRef::root("/ocfl"));
        let object = Arc::new(
            EntityRef::new(EntityType::Object, "foo", "/ocfl/foo").with_parent(root),
        );
        let version = Arc::new(
            EntityRef::new(EntityType::Version, "bar", "/ocfl/foo/bar").with_parent(object),
        );
        EntityRef::new(EntityType::File, "baz", "/ocfl/foo/bar/content/baz").with_parent(version)
    }

    #[test]
    fn type_names_round_trip() {
        for kind in [
            EntityType::Any,
            EntityType::File,
            EntityType::Version,
            EntityType::Object,
            EntityType::Intermediate,
            EntityType::Root,
        ] {
            assert_eq!(kind.to_string().parse::<EntityType>().unwrap(), kind);
        }
    }

    #[test]
    fn unknown_type_name_is_rejected() {
        assert_eq!(
            "bucket".parse::<EntityType>(),
            Err(TypeError::UnknownEntityType("bucket".into()))
        );
        assert_eq!("OBJECT".parse::<EntityType>(), Ok(EntityType::Object));
    }

    #[test]
    fn types_are_ordered_by_specificity() {
        assert!(EntityType::Root > EntityType::Intermediate);
        assert!(EntityType::Intermediate > EntityType::Object);
        assert!(EntityType::Object > EntityType::Version);
        assert!(EntityType::Version > EntityType::File);
        assert!(EntityType::File > EntityType::Any);
        assert!(EntityType::Object.is_object_or_above());
        assert!(!EntityType::Version.is_object_or_above());
    }

    #[test]
    fn coords_of_each_level() {
        assert!(EntityRef::root("/ocfl").coords().is_empty());
        assert_eq!(
            EntityRef::new(EntityType::Object, "foo", "/x").coords(),
            vec!["foo"]
        );

        let file = file_ref();
        assert_eq!(file.coords(), vec!["foo", "bar", "baz"]);
        assert_eq!(file.parent.as_ref().unwrap().coords(), vec!["foo", "bar"]);
    }

    #[test]
    fn intermediates_are_not_coordinates() {
        let root = Arc::new(EntityRef::root("/ocfl"));
        let dir = EntityRef::new(EntityType::Intermediate, "a/b", "/ocfl/a/b").with_parent(root);
        assert!(dir.coords().is_empty());
    }

    #[test]
    fn lineage_ends_at_root() {
        let file = file_ref();
        let kinds: Vec<EntityType> = file.lineage().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            [
                EntityType::File,
                EntityType::Version,
                EntityType::Object,
                EntityType::Root
            ]
        );
        assert_eq!(file.object_id(), Some("foo"));
        assert_eq!(file.version_id(), Some("bar"));
        assert_eq!(file.ancestor(EntityType::Root).unwrap().addr(), Path::new("/ocfl"));
    }

    #[test]
    fn select_matching() {
        assert!(Select::default().matches(EntityType::File));
        assert!(Select::kind(EntityType::Version).matches(EntityType::Version));
        assert!(!Select::kind(EntityType::Version).matches(EntityType::File));
        assert!(Select::kind(EntityType::File).head_only().head);
    }
}
