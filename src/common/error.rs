//! Error types for the volume catalog

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    // === Request Errors ===
    #[error("Invalid volume: {0}")]
    Validation(String),

    #[error("Volume not found: {0}")]
    NotFound(String),

    #[error("Volume already exists: {0}")]
    Conflict(String),

    // === Storage Errors ===
    #[error("Store error: {0}")]
    Store(String),

    #[error("RocksDB error: {0}")]
    RocksDb(#[from] rocksdb::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // === Config Errors ===
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // === Generic ===
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Machine-readable error kind, used in JSON error payloads
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Validation(_) => "validation_error",
            Error::NotFound(_) => "not_found",
            Error::Conflict(_) => "conflict",
            Error::Store(_) | Error::RocksDb(_) | Error::Io(_) => "store_error",
            Error::InvalidConfig(_) => "invalid_config",
            Error::Internal(_) => "internal_error",
        }
    }

    /// Was this error caused by the caller's input rather than the store?
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Error::Validation(_) | Error::NotFound(_) | Error::Conflict(_)
        )
    }
}

impl From<::config::ConfigError> for Error {
    fn from(e: ::config::ConfigError) -> Self {
        Error::InvalidConfig(e.to_string())
    }
}

impl From<tokio::task::JoinError> for Error {
    fn from(e: tokio::task::JoinError) -> Self {
        Error::Internal(format!("Store task failed: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(Error::Validation("x".into()).kind(), "validation_error");
        assert_eq!(Error::NotFound("B001".into()).kind(), "not_found");
        assert_eq!(Error::Conflict("B001".into()).kind(), "conflict");
        assert_eq!(Error::Store("disk".into()).kind(), "store_error");
        assert_eq!(
            Error::Io(std::io::Error::other("boom")).kind(),
            "store_error"
        );
    }

    #[test]
    fn test_client_errors() {
        assert!(Error::Validation("x".into()).is_client_error());
        assert!(Error::Conflict("x".into()).is_client_error());
        assert!(!Error::Store("x".into()).is_client_error());
        assert!(!Error::Internal("x".into()).is_client_error());
    }
}
