//! Content digests for OCFL repositories.
//!
//! Provides the digest capability used by object sessions: a streaming
//! [`ContentDigester`] for the OCFL digest algorithms this workspace can
//! compute, and a [`TeeWriter`] that copies bytes to a destination and a
//! digester at the same time.
//!
//! All hashing wraps established libraries; no custom cryptography.

pub mod digest;
pub mod error;
pub mod tee;

pub use digest::{ContentDigester, DigestAlgorithm};
pub use error::{DigestError, DigestResult};
pub use tee::TeeWriter;
