//! Structural validation of an [`Inventory`].
//!
//! Checks the invariants a session relies on before it writes an inventory:
//! versions named `v1..vN` with uniform padding, `head` naming the last one,
//! every state digest backed by manifest content, and no path listed twice.

use std::collections::HashSet;

use ocfl_types::VersionId;

use crate::error::{InventoryError, InventoryResult};
use crate::inventory::Inventory;
use crate::manifest::reverse_index;

impl Inventory {
    /// Validate the inventory, returning the first problem found as
    /// [`InventoryError::Inconsistent`].
    pub fn validate(&self) -> InventoryResult<()> {
        let fail = |reason: String| Err(InventoryError::inconsistent(&self.id, reason));

        if self.id.is_empty() {
            return fail("object id is empty".into());
        }
        if self.digest_algorithm.as_str().is_empty() {
            return fail("digest algorithm is empty".into());
        }
        if self.versions.is_empty() {
            return fail("inventory has no versions".into());
        }

        let padding = self.versions.keys().next().and_then(VersionId::padding);
        for (expected, name) in (1u64..).zip(self.versions.keys()) {
            let Ok(n) = name.number() else {
                return fail(format!("malformed version name '{name}'"));
            };
            if n != expected {
                return fail(format!("versions are not consecutive: found {name}, expected number {expected}"));
            }
            match VersionId::from_number(n, padding) {
                Ok(wanted) if wanted == *name => {}
                _ => return fail(format!("version {name} does not match the padding of the first version")),
            }
        }

        if self.versions.keys().next_back() != Some(&self.head) {
            return fail(format!("head {} is not the latest version", self.head));
        }

        if let Some((digest, _)) = self.manifest.iter().find(|(_, paths)| paths.is_empty()) {
            return fail(format!("manifest digest {} lists no paths", digest.short()));
        }
        if let Err(path) = reverse_index(&self.manifest) {
            return fail(format!("physical path '{path}' listed under two digests"));
        }

        for (name, version) in &self.versions {
            let mut seen = HashSet::new();
            for (digest, paths) in &version.state {
                if !self.manifest.contains_key(digest) {
                    return fail(format!("digest {} of version {name} is not in the manifest", digest.short()));
                }
                if paths.is_empty() {
                    return fail(format!("digest {} of version {name} lists no paths", digest.short()));
                }
                for path in paths {
                    if !seen.insert(path.as_str()) {
                        return fail(format!("logical path '{path}' appears twice in version {name}"));
                    }
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::manifest::Digest;
    use crate::version::Version;
    use crate::{Inventory, InventoryError, VersionId};

    fn valid() -> Inventory {
        let mut inv = Inventory::new("obj");
        inv.add_file("a.txt", "v1/content/a.txt", &Digest::new("aa")).unwrap();
        inv.stage_next_version().unwrap();
        inv.add_file("b.txt", "v2/content/b.txt", &Digest::new("bb")).unwrap();
        inv
    }

    fn assert_inconsistent(inv: &Inventory, needle: &str) {
        match inv.validate() {
            Err(InventoryError::Inconsistent { reason, .. }) => {
                assert!(reason.contains(needle), "{reason:?} should mention {needle:?}")
            }
            other => panic!("expected inconsistency, got {other:?}"),
        }
    }

    #[test]
    fn well_formed_inventory_validates() {
        valid().validate().unwrap();
        Inventory::new("fresh").validate().unwrap();
    }

    #[test]
    fn detects_version_gap() {
        let mut inv = valid();
        let v2 = inv.versions.remove(&VersionId::new("v2")).unwrap();
        inv.versions.insert(VersionId::new("v3"), v2);
        inv.head = VersionId::new("v3");
        assert_inconsistent(&inv, "not consecutive");
    }

    #[test]
    fn detects_stale_head() {
        let mut inv = valid();
        inv.head = VersionId::first();
        assert_inconsistent(&inv, "not the latest");
    }

    #[test]
    fn detects_mixed_padding() {
        let mut inv = valid();
        let v1 = inv.versions.remove(&VersionId::first()).unwrap();
        inv.versions.insert(VersionId::new("v01"), v1);
        assert_inconsistent(&inv, "padding");
    }

    #[test]
    fn detects_state_without_content() {
        let mut inv = valid();
        inv.versions
            .get_mut(&VersionId::new("v2"))
            .unwrap()
            .state
            .insert(Digest::new("cc"), vec!["c.txt".into()]);
        assert_inconsistent(&inv, "not in the manifest");
    }

    #[test]
    fn detects_duplicate_logical_path() {
        let mut inv = valid();
        inv.versions
            .get_mut(&VersionId::new("v2"))
            .unwrap()
            .state
            .insert(Digest::new("bb"), vec!["a.txt".into()]);
        assert_inconsistent(&inv, "appears twice");
    }

    #[test]
    fn detects_shared_physical_path() {
        let mut inv = valid();
        inv.manifest
            .insert(Digest::new("cc"), vec!["v1/content/a.txt".into()]);
        assert_inconsistent(&inv, "two digests");
    }

    #[test]
    fn detects_empty_inventory() {
        let mut inv = valid();
        inv.versions.clear();
        assert_inconsistent(&inv, "no versions");

        let mut inv = valid();
        inv.versions.insert(VersionId::new("v3"), Version::new());
        inv.head = VersionId::new("v3");
        inv.validate().unwrap();
        inv.id.clear();
        assert_inconsistent(&inv, "empty");
    }
}
