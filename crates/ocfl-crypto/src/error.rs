/// Errors from digest operations.
#[derive(Debug, thiserror::Error)]
pub enum DigestError {
    /// The algorithm is a valid OCFL name but cannot be computed here.
    #[error("unsupported digest algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// Failure reading the content being digested.
    #[error("I/O error while digesting: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for digest operations.
pub type DigestResult<T> = Result<T, DigestError>;
