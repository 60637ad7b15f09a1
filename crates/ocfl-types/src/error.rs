use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid OCFL version '{0}': expected 'v' followed by a positive integer")]
    InvalidVersion(String),

    #[error("version '{0}' does not fit the zero padding of its object")]
    PaddingOverflow(String),

    #[error("unknown OCFL entity type: {0}")]
    UnknownEntityType(String),
}

/// Result alias for type operations.
pub type TypeResult<T> = Result<T, TypeError>;
