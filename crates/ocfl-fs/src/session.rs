//! Object sessions: read one version of an object, or stage and commit a
//! new one.
//!
//! A writing session streams each `put` into a durable write while digesting
//! it, then records the file in its in-memory inventory under the session
//! lock. Nothing but content files reaches the disk before `commit`, and a
//! new object only becomes visible when its marker is written, last.

use std::collections::HashSet;
use std::fs;
use std::io::{self, Read};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use ocfl_crypto::{ContentDigester, DigestAlgorithm, TeeWriter};
use ocfl_inventory::version::truncate_to_millis;
use ocfl_inventory::{Digest, Inventory, InventoryError, User, INVENTORY_FILE};
use ocfl_types::{EntityRef, EntityType, VersionId};
use tracing::{debug, info};

use crate::atomic::{write_file, ManagedWrite};
use crate::driver::FsDriver;
use crate::error::{FsError, FsResult, IoContext};
use crate::layout::PathGenerator;
use crate::marker::{is_root, write_marker, CONTENT_DIR};
use crate::resolve::read_inventory;
use crate::traits::Session;
use crate::types::{CommitInfo, OpenOptions, VersionSelector};

/// What a session was opened to do.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Intent {
    /// Read an existing version. Writes are rejected.
    Read,
    /// Write `v1` of an object that does not exist yet.
    NewObject,
    /// Write a new version on top of the current head.
    NewVersion,
}

struct SessionState {
    inventory: Inventory,
    /// Head of the object on disk when the session was opened.
    base_head: Option<VersionId>,
    /// Logical paths copied from the previous version and not yet replaced.
    carried: HashSet<String>,
    closed: bool,
}

/// A session on one version of one object.
pub struct FsSession {
    object: Arc<EntityRef>,
    version: VersionId,
    intent: Intent,
    algorithm: DigestAlgorithm,
    file_paths: Option<Arc<dyn PathGenerator>>,
    state: Mutex<SessionState>,
}

impl std::fmt::Debug for FsSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FsSession")
            .field("object", &self.object.id)
            .field("version", &self.version)
            .field("intent", &self.intent)
            .finish()
    }
}

impl FsSession {
    pub(crate) fn open(driver: &FsDriver, id: &str, options: OpenOptions) -> FsResult<Self> {
        match driver.locate_object(id)? {
            None if !options.create => Err(FsError::not_found(id, EntityType::Object)),
            None => Self::create(driver, id),
            Some((object, inventory)) => match options.version {
                VersionSelector::New => Self::next_version(driver, object, inventory),
                VersionSelector::Head => {
                    let head = inventory.head.clone();
                    Self::read(object, inventory, head)
                }
                VersionSelector::Named(version) => Self::read(object, inventory, version),
            },
        }
    }

    fn create(driver: &FsDriver, id: &str) -> FsResult<Self> {
        let file_paths = require(driver.file_paths(), "no file path generator configured")?;
        let object_paths = require(driver.object_paths(), "no object path generator configured")?;
        let root = driver.root_ref()?;

        let rel = object_paths.generate(id);
        let rel = checked_relative(&rel)?;
        let dir = root.addr.join(rel);
        fs::create_dir_all(&dir).at(&dir)?;

        let inventory = Inventory::with_algorithm(id, driver.algorithm().clone());
        let version = inventory.head.clone();
        info!(object = %id, path = %dir.display(), "initializing new object");

        Ok(Self {
            object: Arc::new(EntityRef::new(EntityType::Object, id, dir).with_parent(root)),
            version,
            intent: Intent::NewObject,
            algorithm: inventory.digest_algorithm.clone(),
            file_paths: Some(file_paths),
            state: Mutex::new(SessionState {
                inventory,
                base_head: None,
                carried: HashSet::new(),
                closed: false,
            }),
        })
    }

    fn next_version(driver: &FsDriver, object: EntityRef, mut inventory: Inventory) -> FsResult<Self> {
        let file_paths = require(driver.file_paths(), "no file path generator configured")?;
        if !inventory.digest_algorithm.is_supported() {
            return Err(FsError::NotReady {
                reason: format!("cannot compute digest algorithm {}", inventory.digest_algorithm),
            });
        }

        let base_head = inventory.head.clone();
        let carried = inventory
            .head_version()?
            .state
            .values()
            .flatten()
            .cloned()
            .collect();
        let version = inventory.stage_next_version()?;
        debug!(object = %object.id, from = %base_head, to = %version, "staged new version");

        Ok(Self {
            object: Arc::new(object),
            version,
            intent: Intent::NewVersion,
            algorithm: inventory.digest_algorithm.clone(),
            file_paths: Some(file_paths),
            state: Mutex::new(SessionState {
                inventory,
                base_head: Some(base_head),
                carried,
                closed: false,
            }),
        })
    }

    fn read(object: EntityRef, inventory: Inventory, version: VersionId) -> FsResult<Self> {
        if let Err(InventoryError::NotFound { .. }) = inventory.version(&version) {
            return Err(FsError::not_found(
                format!("{version} of object {}", object.id),
                EntityType::Version,
            ));
        }
        Ok(Self {
            object: Arc::new(object),
            version,
            intent: Intent::Read,
            algorithm: inventory.digest_algorithm.clone(),
            file_paths: None,
            state: Mutex::new(SessionState {
                base_head: Some(inventory.head.clone()),
                inventory,
                carried: HashSet::new(),
                closed: false,
            }),
        })
    }

    pub fn object(&self) -> &EntityRef {
        &self.object
    }

    /// The version this session reads or writes.
    pub fn version(&self) -> &VersionId {
        &self.version
    }

    pub fn intent(&self) -> Intent {
        self.intent
    }

    /// A copy of the session's current inventory.
    pub fn inventory(&self) -> FsResult<Inventory> {
        Ok(self.lock()?.inventory.clone())
    }

    fn lock(&self) -> FsResult<MutexGuard<'_, SessionState>> {
        self.state.lock().map_err(|_| FsError::LockPoisoned)
    }

    /// Why a read session refuses writes.
    fn read_only_error(&self) -> FsResult<FsError> {
        let head = self.lock()?.inventory.head.clone();
        if self.version < head {
            Ok(FsError::VersionConflict {
                target: self.version.clone(),
                head,
            })
        } else {
            Ok(FsError::NotReady {
                reason: format!("session on {} {} is read-only", self.object.id, self.version),
            })
        }
    }

    /// Fails once another session has published this session's version.
    fn check_unpublished(&self) -> FsResult<()> {
        let published = self.object.addr.join(self.version.as_str()).join(INVENTORY_FILE);
        if !published.try_exists().at(&published)? {
            return Ok(());
        }
        let head = read_inventory(&self.object.addr)?.head;
        Err(FsError::VersionConflict {
            target: self.version.clone(),
            head,
        })
    }

    fn write_inventories(&self, inventory: &Inventory) -> FsResult<()> {
        let bytes = inventory.to_json_vec()?;
        let algorithm = &inventory.digest_algorithm;
        let digest = ContentDigester::digest_bytes(algorithm, &bytes)?;
        let sidecar_name = format!("{INVENTORY_FILE}.{algorithm}");
        let sidecar = format!("{digest}  {INVENTORY_FILE}\n");

        let version_dir = self.object.addr.join(self.version.as_str());
        fs::create_dir_all(&version_dir).at(&version_dir)?;

        for dir in [version_dir.as_path(), self.object.addr.as_path()] {
            write_file(&dir.join(INVENTORY_FILE), &bytes)?;
            write_file(&dir.join(&sidecar_name), sidecar.as_bytes())?;
        }
        Ok(())
    }
}

impl Session for FsSession {
    fn put<R: Read>(&self, logical_path: &str, mut reader: R) -> FsResult<()> {
        if self.lock()?.closed {
            return Err(FsError::Closed);
        }
        if self.intent == Intent::Read {
            return Err(self.read_only_error()?);
        }
        let file_paths = require(self.file_paths.clone(), "no file path generator configured")?;
        self.check_unpublished()?;

        let generated = file_paths.generate(logical_path);
        let content_path = checked_relative(&generated)?;
        let physical = format!("{}/{CONTENT_DIR}/{content_path}", self.version);
        let target = self.object.addr.join(&physical);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).at(parent)?;
        }

        let mut write = ManagedWrite::begin(&target)?;
        let digester = ContentDigester::new(&self.algorithm)?;
        let mut tee = TeeWriter::new(&mut write, digester);
        io::copy(&mut reader, &mut tee).at(&target)?;
        let (_, digester) = tee.into_parts();
        let digest = Digest::new(digester.finalize_hex());

        let mut state = self.lock()?;
        if state.closed {
            return Err(FsError::Closed);
        }

        // A path carried over from the previous version may be replaced.
        let replaced = if state.carried.remove(logical_path) {
            state.inventory.remove_logical_path(logical_path)?
        } else {
            None
        };

        let checked = state
            .inventory
            .check_add(logical_path, &physical, &digest)
            .map_err(FsError::from)
            .and_then(|()| write.commit());
        if let Err(e) = checked {
            if let Some(previous) = replaced {
                state.inventory.add_logical_path(logical_path, &previous)?;
                state.carried.insert(logical_path.to_string());
            }
            return Err(e);
        }

        state.inventory.add_file(logical_path, &physical, &digest)?;
        debug!(
            object = %self.object.id,
            version = %self.version,
            logical = logical_path,
            physical = %physical,
            digest = digest.short(),
            "stored file"
        );
        Ok(())
    }

    fn commit(&self, info: CommitInfo) -> FsResult<()> {
        let mut state = self.lock()?;
        if state.closed {
            return Err(FsError::Closed);
        }

        match self.intent {
            Intent::Read => {
                state.closed = true;
                return Ok(());
            }
            Intent::NewVersion => {
                let on_disk = read_inventory(&self.object.addr)?;
                if state.base_head.as_ref() != Some(&on_disk.head) {
                    return Err(FsError::VersionConflict {
                        target: self.version.clone(),
                        head: on_disk.head,
                    });
                }
            }
            Intent::NewObject => {
                if is_root(&self.object.addr, EntityType::Object)?.is_some() {
                    let on_disk = read_inventory(&self.object.addr)?;
                    return Err(FsError::VersionConflict {
                        target: self.version.clone(),
                        head: on_disk.head,
                    });
                }
            }
        }

        let version = state.inventory.versions.get_mut(&self.version).ok_or_else(|| {
            FsError::Inventory(InventoryError::Inconsistent {
                object: self.object.id.clone(),
                reason: format!("staged version {} disappeared", self.version),
            })
        })?;
        version.created = truncate_to_millis(info.date);
        version.message = info.message;
        version.user = User::new(info.name, info.address);
        let files = version.file_count();

        state.inventory.validate()?;
        self.write_inventories(&state.inventory)?;
        if self.intent == Intent::NewObject {
            write_marker(&self.object.addr, EntityType::Object)?;
        }
        state.closed = true;

        info!(
            object = %self.object.id,
            version = %self.version,
            files,
            path = %self.object.addr.display(),
            "committed version"
        );
        Ok(())
    }
}

fn require(
    generator: Option<Arc<dyn PathGenerator>>,
    reason: &str,
) -> FsResult<Arc<dyn PathGenerator>> {
    generator.ok_or_else(|| FsError::NotReady {
        reason: reason.to_string(),
    })
}

/// Strip leading and trailing `/` and reject paths that would leave their
/// base directory.
fn checked_relative(path: &str) -> FsResult<&str> {
    let trimmed = path.trim_matches('/');
    let invalid = |reason: &str| FsError::InvalidPath {
        path: path.to_string(),
        reason: reason.to_string(),
    };
    if trimmed.is_empty() {
        return Err(invalid("empty path"));
    }
    if trimmed.split('/').any(|seg| seg.is_empty() || seg == "." || seg == "..") {
        return Err(invalid("empty, '.' or '..' segment"));
    }
    if Path::new(trimmed).is_absolute() {
        return Err(invalid("absolute path"));
    }
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::config::{FileLayout, FsConfig, ObjectLayout};
    use crate::fixture::Fixture;
    use crate::marker::OBJECT_MARKER;
    use crate::traits::{Driver, Walker};
    use ocfl_types::Select;

    const OBJECT_ID: &str = "urn:test/myObj";

    fn driver_for(fx: &Fixture) -> FsDriver {
        FsDriver::new(FsConfig::with_root(fx.root())).unwrap()
    }

    fn put_str(session: &FsSession, logical: &str, content: &str) {
        session.put(logical, Cursor::new(content.as_bytes())).unwrap();
    }

    fn files_at(driver: &FsDriver, loc: &[&str], desired: Select) -> Vec<EntityRef> {
        let mut found = Vec::new();
        driver
            .walk(desired, loc, |e| {
                found.push(e);
                Ok::<(), FsError>(())
            })
            .unwrap();
        found
    }

    #[test]
    fn put_and_commit_round_trip() {
        let fx = Fixture::empty();
        let driver = driver_for(&fx);
        let date = Utc.with_ymd_and_hms(2024, 5, 6, 7, 8, 9).unwrap();

        let session = driver.open(OBJECT_ID, OpenOptions::create()).unwrap();
        assert_eq!(session.intent(), Intent::NewObject);
        put_str(&session, "hello/there.txt", "myContent");
        session
            .commit(CommitInfo {
                name: "myUserName".into(),
                address: "my@ddress".into(),
                message: "myMessage".into(),
                date,
            })
            .unwrap();

        let dir = fx.root().join("urn%3Atest%2FmyObj");
        assert!(dir.join(OBJECT_MARKER).is_file());
        assert_eq!(
            fs::read_to_string(dir.join("v1/content/hello/there.txt")).unwrap(),
            "myContent"
        );

        let inv = read_inventory(&dir).unwrap();
        assert_eq!(inv, read_inventory(&dir.join("v1")).unwrap());
        assert_eq!(inv.id, OBJECT_ID);
        assert_eq!(inv.head, "v1");
        let v1 = inv.head_version().unwrap();
        assert_eq!(v1.user, User::new("myUserName", "my@ddress"));
        assert_eq!(v1.message, "myMessage");
        assert_eq!(v1.created, date);

        let files = inv.files(&inv.head).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].logical_path, "hello/there.txt");
        assert_eq!(files[0].physical_path, "v1/content/hello/there.txt");
    }

    #[test]
    fn sidecar_holds_inventory_digest() {
        let fx = Fixture::empty();
        let driver = driver_for(&fx);
        let session = driver.open(OBJECT_ID, OpenOptions::create()).unwrap();
        put_str(&session, "a", "a");
        session.commit(CommitInfo::default()).unwrap();

        let dir = session.object().addr.clone();
        let bytes = fs::read(dir.join(INVENTORY_FILE)).unwrap();
        let digest = ContentDigester::digest_bytes(&DigestAlgorithm::sha512(), &bytes).unwrap();
        assert_eq!(
            fs::read_to_string(dir.join("inventory.json.sha512")).unwrap(),
            format!("{digest}  inventory.json\n")
        );
        assert!(dir.join("v1/inventory.json.sha512").is_file());
    }

    #[test]
    fn uncommitted_object_is_invisible() {
        let fx = Fixture::empty();
        let driver = driver_for(&fx);
        let session = driver.open(OBJECT_ID, OpenOptions::create()).unwrap();
        put_str(&session, "a.txt", "a");

        let objects = files_at(&driver, &[], Select::kind(EntityType::Object));
        assert!(objects.is_empty());
        assert!(driver.open(OBJECT_ID, OpenOptions::read()).unwrap_err().is_not_found());

        session.commit(CommitInfo::default()).unwrap();
        assert_eq!(files_at(&driver, &[], Select::kind(EntityType::Object)).len(), 1);
    }

    #[test]
    fn new_version_carries_and_replaces() {
        let fx = Fixture::empty();
        let driver = driver_for(&fx);

        let s1 = driver.open(OBJECT_ID, OpenOptions::create()).unwrap();
        put_str(&s1, "files/one.txt", "File one content");
        put_str(&s1, "files/two.txt", "File two content");
        s1.commit(CommitInfo::default()).unwrap();

        let s2 = driver.open(OBJECT_ID, OpenOptions::new_version()).unwrap();
        assert_eq!(s2.version(), &VersionId::new("v2"));
        put_str(&s2, "files/two.txt", "changed");
        put_str(&s2, "files/three.txt", "File three content");
        s2.commit(CommitInfo::default()).unwrap();

        let inv = read_inventory(&s2.object().addr).unwrap();
        let v2 = inv.files(&VersionId::new("v2")).unwrap();
        let one = v2.iter().find(|f| f.logical_path == "files/one.txt").unwrap();
        assert_eq!(one.physical_path, "v1/content/files/one.txt");
        let two = v2.iter().find(|f| f.logical_path == "files/two.txt").unwrap();
        assert_eq!(two.physical_path, "v2/content/files/two.txt");
        assert_eq!(v2.len(), 3);

        let v1_two = inv.file(&VersionId::first(), "files/two.txt").unwrap().unwrap();
        assert_eq!(v1_two.physical_path, "v1/content/files/two.txt");
    }

    #[test]
    fn conflicting_put_in_same_version() {
        let fx = Fixture::empty();
        let driver = driver_for(&fx);
        let session = driver.open(OBJECT_ID, OpenOptions::create()).unwrap();
        put_str(&session, "a.txt", "first");
        put_str(&session, "a.txt", "first");

        let err = session.put("a.txt", Cursor::new(b"second".to_vec())).unwrap_err();
        assert!(matches!(err, FsError::Inventory(InventoryError::Conflict { .. })));
        // The stored content is untouched.
        let stored = session.object().addr.join("v1/content/a.txt");
        assert_eq!(fs::read_to_string(stored).unwrap(), "first");
    }

    #[test]
    fn failed_put_leaves_no_partial_file() {
        struct Broken(usize);
        impl Read for Broken {
            fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
                if self.0 == 0 {
                    return Err(io::Error::new(io::ErrorKind::Other, "source failed"));
                }
                self.0 -= 1;
                buf[0] = b'x';
                Ok(1)
            }
        }

        let fx = Fixture::empty();
        let driver = driver_for(&fx);
        let session = driver.open(OBJECT_ID, OpenOptions::create()).unwrap();
        assert!(session.put("dir/partial.txt", Broken(5)).is_err());

        let content_dir = session.object().addr.join("v1/content/dir");
        assert_eq!(fs::read_dir(&content_dir).unwrap().count(), 0);
        assert!(session.inventory().unwrap().files(&VersionId::first()).unwrap().is_empty());
    }

    #[test]
    fn read_sessions_reject_writes() {
        let fx = Fixture::new();
        let driver = FsDriver::new(FsConfig {
            object_layout: ObjectLayout::None,
            ..FsConfig::with_root(fx.root())
        })
        .unwrap();

        let head = driver.open("urn:/a/d/obj2", OpenOptions::read()).unwrap();
        assert_eq!(head.version(), &VersionId::new("v3"));
        assert!(matches!(
            head.put("x", Cursor::new(b"x".to_vec())),
            Err(FsError::NotReady { .. })
        ));

        let old = driver.open("urn:/a/d/obj2", OpenOptions::at("v1")).unwrap();
        assert!(matches!(
            old.put("x", Cursor::new(b"x".to_vec())),
            Err(FsError::VersionConflict { .. })
        ));

        head.commit(CommitInfo::default()).unwrap();
        assert!(matches!(head.commit(CommitInfo::default()), Err(FsError::Closed)));
    }

    #[test]
    fn open_errors() {
        let fx = Fixture::new();
        let driver = driver_for(&fx);
        assert!(matches!(
            driver.open("urn:nothing", OpenOptions::read()),
            Err(FsError::NotFound { expected: EntityType::Object, .. })
        ));

        let scan = FsDriver::new(FsConfig {
            object_layout: ObjectLayout::None,
            ..FsConfig::with_root(fx.root())
        })
        .unwrap();
        assert!(matches!(
            scan.open("urn:/a/obj3", OpenOptions::at("v9")),
            Err(FsError::NotFound { expected: EntityType::Version, .. })
        ));
        assert!(matches!(
            scan.open("urn:new", OpenOptions::create()),
            Err(FsError::NotReady { .. })
        ));

        let read_only = FsDriver::new(FsConfig {
            object_layout: ObjectLayout::None,
            file_layout: FileLayout::None,
            ..FsConfig::with_root(fx.root())
        })
        .unwrap();
        assert!(matches!(
            read_only.open("urn:/a/obj3", OpenOptions::new_version()),
            Err(FsError::NotReady { .. })
        ));
    }

    #[test]
    fn closed_after_commit() {
        let fx = Fixture::empty();
        let driver = driver_for(&fx);
        let session = driver.open(OBJECT_ID, OpenOptions::create()).unwrap();
        put_str(&session, "a", "a");
        session.commit(CommitInfo::default()).unwrap();
        assert!(matches!(
            session.put("b", Cursor::new(b"b".to_vec())),
            Err(FsError::Closed)
        ));
        assert!(matches!(session.commit(CommitInfo::default()), Err(FsError::Closed)));
    }

    #[test]
    fn stale_commit_is_rejected() {
        let fx = Fixture::empty();
        let driver = driver_for(&fx);
        let s1 = driver.open(OBJECT_ID, OpenOptions::create()).unwrap();
        put_str(&s1, "a", "a");
        s1.commit(CommitInfo::default()).unwrap();

        let first = driver.open(OBJECT_ID, OpenOptions::new_version()).unwrap();
        let second = driver.open(OBJECT_ID, OpenOptions::new_version()).unwrap();
        put_str(&first, "b", "b");
        put_str(&second, "c", "c");
        first.commit(CommitInfo::default()).unwrap();

        match second.commit(CommitInfo::default()) {
            Err(FsError::VersionConflict { target, head }) => {
                assert_eq!(target, "v2");
                assert_eq!(head, "v2");
            }
            other => panic!("expected a version conflict, got {other:?}"),
        }
        let inv = read_inventory(&first.object().addr).unwrap();
        assert!(inv.file(&inv.head, "b").unwrap().is_some());
        assert!(inv.file(&inv.head, "c").unwrap().is_none());
    }

    #[test]
    fn stale_put_leaves_published_content_alone() {
        let fx = Fixture::empty();
        let driver = driver_for(&fx);
        let s1 = driver.open(OBJECT_ID, OpenOptions::create()).unwrap();
        put_str(&s1, "a", "a");
        s1.commit(CommitInfo::default()).unwrap();

        let first = driver.open(OBJECT_ID, OpenOptions::new_version()).unwrap();
        let stale = driver.open(OBJECT_ID, OpenOptions::new_version()).unwrap();
        put_str(&first, "b", "good");
        first.commit(CommitInfo::default()).unwrap();
        let third = driver.open(OBJECT_ID, OpenOptions::new_version()).unwrap();
        put_str(&third, "c", "c");
        third.commit(CommitInfo::default()).unwrap();

        match stale.put("b", Cursor::new(b"evil".to_vec())) {
            Err(FsError::VersionConflict { target, head }) => {
                assert_eq!(target, "v2");
                assert_eq!(head, "v3");
            }
            other => panic!("expected a version conflict, got {other:?}"),
        }
        let stored = fs::read_to_string(first.object().addr.join("v2/content/b")).unwrap();
        assert_eq!(stored, "good");
    }

    #[test]
    fn rejects_escaping_paths() {
        let fx = Fixture::empty();
        let driver = driver_for(&fx);
        let session = driver.open(OBJECT_ID, OpenOptions::create()).unwrap();
        for bad in ["../escape", "a/../../b", "", "/", "a//b"] {
            assert!(
                matches!(session.put(bad, Cursor::new(b"x".to_vec())), Err(FsError::InvalidPath { .. })),
                "{bad:?} should be rejected"
            );
        }
        put_str(&session, "/leading/slash", "ok");
        assert!(session.object().addr.join("v1/content/leading/slash").is_file());
    }

    #[test]
    fn concurrent_puts() {
        let fx = Fixture::empty();
        let driver = driver_for(&fx);
        let session = driver.open(OBJECT_ID, OpenOptions::create()).unwrap();

        std::thread::scope(|scope| {
            for worker in 0..4 {
                let session = &session;
                scope.spawn(move || {
                    for i in 0..10 {
                        let name = format!("w{worker}/f{i}.txt");
                        session.put(&name, Cursor::new(name.clone().into_bytes())).unwrap();
                    }
                });
            }
        });
        session.commit(CommitInfo::default()).unwrap();

        let inv = read_inventory(&session.object().addr).unwrap();
        assert_eq!(inv.files(&inv.head).unwrap().len(), 40);
        assert_eq!(inv.manifest.len(), 40);
    }

    #[test]
    fn hashed_layout_and_sha256() {
        let fx = Fixture::empty();
        let driver = FsDriver::new(FsConfig {
            object_layout: ObjectLayout::HashedNTuple,
            digest_algorithm: DigestAlgorithm::sha256(),
            ..FsConfig::with_root(fx.root())
        })
        .unwrap();
        let session = driver.open("object-01", OpenOptions::create()).unwrap();
        put_str(&session, "a.txt", "a");
        session.commit(CommitInfo::default()).unwrap();

        let rel = session.object().addr.strip_prefix(fx.root()).unwrap().to_path_buf();
        assert_eq!(rel.components().count(), 4);
        let inv = read_inventory(&session.object().addr).unwrap();
        assert_eq!(inv.digest_algorithm, DigestAlgorithm::sha256());
        assert!(session.object().addr.join("inventory.json.sha256").is_file());

        let again = driver.open("object-01", OpenOptions::new_version()).unwrap();
        assert_eq!(again.version(), &VersionId::new("v2"));
    }
}
