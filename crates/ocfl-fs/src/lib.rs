//! Filesystem driver for OCFL repositories.
//!
//! Maps physical paths to logical OCFL entities and back, walks bounded
//! scopes of a repository, and writes new objects and versions through
//! object sessions.
//!
//! # Modules
//!
//! - [`marker`] -- marker files and root detection
//! - [`resolve`] -- physical path → entity resolution, root location
//! - [`walk`] -- [`Scope`], the two-mode repository walker
//! - [`session`] -- [`FsSession`], reading and writing one object
//! - [`driver`] -- [`FsDriver`], the facade tying the above together
//! - [`atomic`] -- [`ManagedWrite`], temp-file-then-rename writes
//! - [`layout`] -- [`PathGenerator`]s for object and content paths
//! - [`config`] -- [`FsConfig`], TOML-loadable driver configuration
//! - [`traits`] -- the [`Walker`], [`Session`] and [`Driver`] seams

pub mod atomic;
pub mod config;
pub mod driver;
pub mod error;
pub mod layout;
pub mod marker;
pub mod resolve;
pub mod session;
pub mod traits;
pub mod types;
pub mod walk;

#[cfg(test)]
pub(crate) mod fixture;

pub use atomic::{ManagedWrite, ATOMIC_PREFIX};
pub use config::{FileLayout, FsConfig, ObjectLayout};
pub use driver::FsDriver;
pub use error::{FsError, FsResult};
pub use layout::{HashedNTuple, Passthrough, PathGenerator, UrlEncoded};
pub use marker::{is_root, OBJECT_MARKER, ROOT_MARKER};
pub use resolve::{init_root, locate_root, read_inventory, resolve, Resolved};
pub use session::FsSession;
pub use traits::{Driver, Session, Walker};
pub use types::{CommitInfo, OpenOptions, VersionSelector};
pub use walk::Scope;
