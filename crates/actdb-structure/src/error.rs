//! Error types for the document tree.

use thiserror::Error;

/// Fatal structural errors.
///
/// These indicate data-integrity bugs, not recoverable conditions: a date
/// recomputation that hits one of them aborts rather than persisting a
/// half-consistent act.
#[derive(Error, Debug)]
pub enum StructureError {
    /// A working article or SAE has no enforcement metadata.
    #[error("element without enforcement metadata at {0}")]
    MissingMetadata(String),

    /// The tree shape contradicts an invariant (wrong child kind, empty
    /// article, malformed block amendment content).
    #[error("malformed document tree: {0}")]
    Malformed(String),
}
