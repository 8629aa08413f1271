//! Error types for the store boundary

use thiserror::Error;

pub type Result<T> = std::result::Result<T, StoreError>;

/// Failures surfaced by an [`crate::ObjectStore`] implementation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("{kind} {name:?} not found")]
    NotFound { kind: &'static str, name: String },

    #[error("{kind} {name:?} already exists")]
    AlreadyExists { kind: &'static str, name: String },

    #[error("conflicting write: {0}")]
    Conflict(String),

    #[error("transient store error: {0}")]
    Transient(String),
}

impl StoreError {
    /// Convenience constructor for not-found errors
    pub fn not_found(kind: &'static str, name: impl Into<String>) -> Self {
        StoreError::NotFound {
            kind,
            name: name.into(),
        }
    }

    /// Convenience constructor for already-exists errors
    pub fn already_exists(kind: &'static str, name: impl Into<String>) -> Self {
        StoreError::AlreadyExists {
            kind,
            name: name.into(),
        }
    }

    /// Whether this is a "not found" failure
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }

    /// Whether this is an "already exists" failure
    pub fn is_already_exists(&self) -> bool {
        matches!(self, StoreError::AlreadyExists { .. })
    }
}
