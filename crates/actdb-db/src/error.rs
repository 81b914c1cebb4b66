//! Error types for the database layer.

use thiserror::Error;

/// Database-level failures.
#[derive(Error, Debug)]
pub enum DbError {
    /// An act with this identifier is already present.
    #[error("act {0} is already in the act set")]
    DuplicateAct(String),

    /// A date arithmetic step left the calendar.
    #[error("invalid date: {0}")]
    InvalidDate(String),

    /// Amendment processing failed.
    #[error(transparent)]
    Amender(#[from] actdb_amender::AmenderError),

    /// Storage failed.
    #[error(transparent)]
    Storage(#[from] actdb_storage::StorageError),

    /// The document tree violated an invariant.
    #[error(transparent)]
    Structure(#[from] actdb_structure::StructureError),
}
