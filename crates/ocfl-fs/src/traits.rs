//! Backend seams: anything that can walk OCFL entities and open object
//! sessions implements these traits. The filesystem driver is the only
//! backend in this workspace.

use std::io::Read;

use ocfl_types::{EntityRef, Select};

use crate::error::{FsError, FsResult};
use crate::types::{CommitInfo, OpenOptions};

/// Visits OCFL entities.
pub trait Walker {
    /// Invoke `f` on every entity matching `desired` within the scope named
    /// by `loc`.
    ///
    /// `loc` is either empty (the whole repository), a single physical path,
    /// or logical coordinates `[object, version, logical path]` with trailing
    /// levels optional. An error returned by `f` stops the walk and is
    /// returned unchanged.
    fn walk<E, F>(&self, desired: Select, loc: &[&str], f: F) -> Result<(), E>
    where
        F: FnMut(EntityRef) -> Result<(), E>,
        E: From<FsError>;
}

/// Read or write access to one object version.
///
/// `put` takes `&self`: several producers may stream content into one
/// session at the same time.
pub trait Session: Send + Sync {
    /// Store the content of `reader` under `logical_path` in the target
    /// version.
    fn put<R: Read>(&self, logical_path: &str, reader: R) -> FsResult<()>;

    /// Stamp and persist the target version. Read sessions simply close.
    fn commit(&self, info: CommitInfo) -> FsResult<()>;
}

/// A repository backend.
pub trait Driver: Walker {
    type Session: Session;

    /// Open a session on object `id`.
    fn open(&self, id: &str, options: OpenOptions) -> FsResult<Self::Session>;
}
