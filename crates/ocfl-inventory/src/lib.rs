//! The OCFL inventory model.
//!
//! An [`Inventory`] is the JSON manifest (`inventory.json`) describing one
//! OCFL object: its version history, the logical state of every version, and
//! the manifest mapping content digests to the physical files that hold them.
//! One digest may map to several physical paths, which is how content is
//! shared across versions without copying bytes.
//!
//! # Key Types
//!
//! - [`Inventory`] -- one object's full version history
//! - [`Version`] / [`User`] -- one committed snapshot and its author
//! - [`Digest`] / [`Manifest`] / [`Fixity`] -- digest-keyed path maps
//! - [`File`] -- a logical file of a version joined against the manifest
//!
//! All operations are in-memory; reading and writing inventories on disk is
//! the responsibility of the storage driver.

pub mod error;
pub mod file;
pub mod inventory;
pub mod manifest;
pub mod validation;
pub mod version;

pub use error::{ConflictKind, InventoryError, InventoryResult};
pub use file::File;
pub use inventory::{Inventory, INVENTORY_FILE, INVENTORY_TYPE};
pub use manifest::{Digest, Fixity, Manifest};
pub use version::{User, Version};

pub use ocfl_crypto::DigestAlgorithm;
pub use ocfl_types::VersionId;
