//! # Error Types
//!
//! Shared error definitions for the core primitives. All errors use
//! `thiserror` for derive-based `Display` and `Error` implementations.

use thiserror::Error;

/// Errors from the core primitives.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Canonical serialization failed.
    #[error("canonicalization failed: {0}")]
    Canonicalization(#[from] serde_json::Error),

    /// An object key was not 32 lowercase hex characters.
    #[error("invalid object key: {0:?}")]
    InvalidKey(String),

    /// A reference was structurally unusable for the requested operation.
    #[error("invalid reference: {0}")]
    InvalidReference(String),
}
