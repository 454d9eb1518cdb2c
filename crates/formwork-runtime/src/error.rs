//! Error types for formwork-runtime

use thiserror::Error;

/// Result type for formwork-runtime operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in formwork-runtime
#[derive(Debug, Error)]
pub enum Error {
    /// The form's actor task has stopped
    #[error("form {0:?} is no longer running")]
    FormClosed(String),

    /// The field's form slot can never be filled
    #[error("field {0} is not attached to any registry slot")]
    Detached(String),

    /// Configuration text could not be parsed
    #[error("invalid form configuration: {0}")]
    Config(#[from] ron::error::SpannedError),

    /// Configuration file could not be read
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    /// Core error
    #[error("core error: {0}")]
    Core(#[from] formwork_core::Error),
}

/// Failure reported by a logic routine
///
/// A failed run is logged and discarded; the form keeps its last committed
/// state.
#[derive(Debug, Error)]
pub enum LogicError {
    #[error("{0}")]
    Message(String),

    /// A helper call was rejected, e.g. metadata aimed at a group of fields
    #[error(transparent)]
    Core(#[from] formwork_core::Error),

    #[error(transparent)]
    Source(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl LogicError {
    pub fn msg(message: impl Into<String>) -> Self {
        LogicError::Message(message.into())
    }
}

// Compile-time check that Error is Send + Sync for thread-safe error propagation.
// This function is never called but will fail to compile if the bound is not satisfied.
fn _assert_error_send_sync<T: Send + Sync>() {}
fn _error_is_send_sync() {
    _assert_error_send_sync::<Error>();
    _assert_error_send_sync::<LogicError>();
}
