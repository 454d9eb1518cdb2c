//! Error types for formwork-core

use thiserror::Error;

/// Core error type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Invalid field path {path:?}: {reason}")]
    InvalidPath { path: String, reason: &'static str },

    /// Metadata can only be written to a field, not to a group of fields
    #[error("Field path {path:?} addresses a group of fields, not a single field")]
    NotAField { path: String },
}

impl Error {
    pub(crate) fn invalid_path(path: impl Into<String>, reason: &'static str) -> Self {
        Error::InvalidPath {
            path: path.into(),
            reason,
        }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
