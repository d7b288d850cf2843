//! Cross-cutting error types for Parley.
//!
//! Domain-specific errors (`AuthError`, `StoreError`, `SessionError`) are
//! defined in their respective crates.

use thiserror::Error;

/// Errors that can be raised by any Parley crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Data failed validation (format, required fields).
    #[error("Validation error: {0}")]
    Validation(String),

    /// The OS random source could not produce bytes for an ID.
    #[error("Random source unavailable: {0}")]
    Random(String),
}
