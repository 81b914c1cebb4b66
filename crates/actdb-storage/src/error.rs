//! Error types for the storage layer.

use actdb_core::ObjectKey;
use thiserror::Error;

/// Storage failures.
#[derive(Error, Debug)]
pub enum StorageError {
    /// No blob exists under the given key.
    #[error("object {0} not found")]
    NotFound(ObjectKey),

    /// Filesystem failure.
    #[error("storage i/o: {0}")]
    Io(#[from] std::io::Error),

    /// Canonicalization failed while computing a content key.
    #[error(transparent)]
    Canonicalization(#[from] actdb_core::CoreError),

    /// A blob or snapshot did not parse as the expected type.
    #[error("corrupt stored object: {0}")]
    Corrupt(#[from] serde_json::Error),

    /// A YAML raw-act file did not parse.
    #[error("corrupt raw act file: {0}")]
    CorruptYaml(#[from] serde_yaml::Error),

    /// A raw-act file has an extension the intake does not recognize.
    #[error("unrecognized raw act file: {0}")]
    UnrecognizedRawAct(String),
}
