//! Test repository shared by the resolver, walker, session and driver tests.
//!
//! ```text
//! root/                      0=ocfl_1.0
//!   a/                       intermediate
//!     obj3/                  urn:/a/obj3
//!     b/                     intermediate
//!       obj4/                urn:/a/b/obj4
//!       c/                   intermediate
//!         obj1/              urn:/a/b/c/obj1
//!     d/                     intermediate
//!       obj2/                urn:/a/d/obj2
//! ```
//!
//! Every object has three versions. `v1` stores one file under two logical
//! names (`<name>.txt`, `<name>-copy.txt`) at `v1/content/1`; `v2` keeps only
//! `<name>.txt`; `v3` adds `<name>-new.txt` at `v3/content/2`.

use std::fs;
use std::path::{Path, PathBuf};

use ocfl_crypto::{ContentDigester, DigestAlgorithm};
use ocfl_inventory::{Digest, Inventory, INVENTORY_FILE};
use ocfl_types::EntityType;
use tempfile::TempDir;

use crate::marker::write_marker;

/// Objects as (name, directory relative to the root).
pub(crate) const OBJECTS: [(&str, &str); 4] = [
    ("obj1", "a/b/c/obj1"),
    ("obj2", "a/d/obj2"),
    ("obj3", "a/obj3"),
    ("obj4", "a/b/obj4"),
];

pub(crate) const INTERMEDIATES: [&str; 4] = ["a", "a/b", "a/b/c", "a/d"];

/// 1 root, 4 intermediates, 4 objects, 12 versions, 20 files.
pub(crate) const TOTAL_ENTITIES: usize = 1 + 4 + 4 + 12 + 20;

pub(crate) struct Fixture {
    _dir: TempDir,
    root: PathBuf,
}

impl Fixture {
    /// The full test repository.
    pub(crate) fn new() -> Self {
        let fx = Self::empty();
        for (name, rel) in OBJECTS {
            write_object(&fx.root.join(rel), name, &format!("urn:/{rel}"));
        }
        fx
    }

    /// An OCFL root with nothing in it.
    pub(crate) fn empty() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("ocflroot");
        fs::create_dir(&root).unwrap();
        write_marker(&root, EntityType::Root).unwrap();
        Self { _dir: dir, root }
    }

    pub(crate) fn root(&self) -> &Path {
        &self.root
    }

    pub(crate) fn object_dir(&self, name: &str) -> PathBuf {
        let (_, rel) = OBJECTS
            .iter()
            .find(|(n, _)| *n == name)
            .unwrap_or_else(|| panic!("no fixture object {name}"));
        self.root.join(rel)
    }
}

fn sha512(content: &str) -> Digest {
    Digest::new(ContentDigester::digest_bytes(&DigestAlgorithm::sha512(), content.as_bytes()).unwrap())
}

fn write_object(dir: &Path, name: &str, id: &str) {
    let original = format!("{name} content");
    let added = format!("{name} new content");
    let (a, b) = (sha512(&original), sha512(&added));

    let main = format!("{name}.txt");
    let copy = format!("{name}-copy.txt");
    let new = format!("{name}-new.txt");

    let mut inv = Inventory::new(id);
    inv.add_file(&main, "v1/content/1", &a).unwrap();
    inv.add_file(&copy, "v1/content/1", &a).unwrap();
    inv.stage_next_version().unwrap();
    inv.remove_logical_path(&copy).unwrap();
    inv.stage_next_version().unwrap();
    inv.add_file(&new, "v3/content/2", &b).unwrap();
    inv.validate().unwrap();

    fs::create_dir_all(dir.join("v1/content")).unwrap();
    fs::create_dir_all(dir.join("v2")).unwrap();
    fs::create_dir_all(dir.join("v3/content")).unwrap();
    fs::write(dir.join("v1/content/1"), &original).unwrap();
    fs::write(dir.join("v3/content/2"), &added).unwrap();

    let json = inv.to_json_vec().unwrap();
    for target in [dir.to_path_buf(), dir.join("v3")] {
        fs::write(target.join(INVENTORY_FILE), &json).unwrap();
    }
    write_marker(dir, EntityType::Object).unwrap();
}
