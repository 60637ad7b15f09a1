//! Foundation types for OCFL repositories.
//!
//! This crate provides the identity and addressing types shared by every
//! other OCFL crate in the workspace.
//!
//! # Key Types
//!
//! - [`EntityType`] -- Kind of node in the OCFL hierarchy, ordered by specificity
//! - [`EntityRef`] -- A node in the hierarchy with a shared link to its parent
//! - [`Select`] -- Desired properties of entities produced by a walk
//! - [`VersionId`] -- OCFL version name (`v1`, `v002`, ...) with padding-aware arithmetic

pub mod entity;
pub mod error;
pub mod version;

pub use entity::{EntityRef, EntityType, Select};
pub use error::{TypeError, TypeResult};
pub use version::VersionId;
