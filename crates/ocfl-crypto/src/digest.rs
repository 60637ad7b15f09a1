use std::fmt;
use std::io::{self, Read, Write};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256, Sha512};

use crate::error::{DigestError, DigestResult};

/// Name of an OCFL digest algorithm, as written in `digestAlgorithm` and in
/// the keys of an inventory's `fixity` block.
///
/// Any name is representable (fixity blocks may use algorithms this crate
/// cannot compute); [`ContentDigester::new`] decides what is computable.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DigestAlgorithm(String);

impl DigestAlgorithm {
    pub fn sha512() -> Self {
        Self("sha512".into())
    }

    pub fn sha256() -> Self {
        Self("sha256".into())
    }

    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if [`ContentDigester`] can compute this algorithm.
    pub fn is_supported(&self) -> bool {
        ContentDigester::new(self).is_ok()
    }
}

impl Default for DigestAlgorithm {
    fn default() -> Self {
        Self::sha512()
    }
}

impl fmt::Debug for DigestAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DigestAlgorithm({})", self.0)
    }
}

impl fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

enum Inner {
    Sha512(Sha512),
    Sha256(Sha256),
}

/// Incremental content digester producing lowercase hex digests.
///
/// Implements [`Write`], so it can sit on either side of an `io::copy` or
/// behind a [`TeeWriter`](crate::TeeWriter).
pub struct ContentDigester {
    algorithm: DigestAlgorithm,
    inner: Inner,
}

impl ContentDigester {
    /// Create a digester for the named algorithm.
    pub fn new(algorithm: &DigestAlgorithm) -> DigestResult<Self> {
        let inner = match algorithm.as_str() {
            "sha512" => Inner::Sha512(Sha512::new()),
            "sha256" => Inner::Sha256(Sha256::new()),
            other => return Err(DigestError::UnsupportedAlgorithm(other.to_string())),
        };
        Ok(Self {
            algorithm: algorithm.clone(),
            inner,
        })
    }

    pub fn algorithm(&self) -> &DigestAlgorithm {
        &self.algorithm
    }

    pub fn update(&mut self, data: &[u8]) {
        match &mut self.inner {
            Inner::Sha512(h) => h.update(data),
            Inner::Sha256(h) => h.update(data),
        }
    }

    /// Consume the digester and return the lowercase hex digest.
    pub fn finalize_hex(self) -> String {
        match self.inner {
            Inner::Sha512(h) => hex::encode(h.finalize()),
            Inner::Sha256(h) => hex::encode(h.finalize()),
        }
    }

    /// Digest an in-memory buffer.
    pub fn digest_bytes(algorithm: &DigestAlgorithm, data: &[u8]) -> DigestResult<String> {
        let mut digester = Self::new(algorithm)?;
        digester.update(data);
        Ok(digester.finalize_hex())
    }

    /// Digest everything readable from `reader`.
    pub fn digest_reader<R: Read>(algorithm: &DigestAlgorithm, mut reader: R) -> DigestResult<String> {
        let mut digester = Self::new(algorithm)?;
        io::copy(&mut reader, &mut digester)?;
        Ok(digester.finalize_hex())
    }
}

impl Write for ContentDigester {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.update(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl fmt::Debug for ContentDigester {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContentDigester")
            .field("algorithm", &self.algorithm)
            .finish()
    }
}
