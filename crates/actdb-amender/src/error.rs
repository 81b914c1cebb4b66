//! Error types for amendment processing.

use thiserror::Error;

/// Fatal amendment-processing errors.
///
/// Everything here aborts the date recomputation that hit it. Recoverable
/// oddities (an amendment whose text is not found, a repeal of a missing
/// subtitle) are logged as warnings instead and never surface as errors.
#[derive(Error, Debug)]
pub enum AmenderError {
    /// An act carries no act-wide default enforcement directive.
    #[error("act {0} has no default enforcement date")]
    MissingDefaultEnforcementDate(String),

    /// An act carries more than one act-wide default enforcement directive.
    #[error("act {0} has multiple default enforcement dates")]
    MultipleDefaultEnforcementDates(String),

    /// A special enforcement directive starts before the act's default.
    #[error("act {act}: special enforcement date {special} precedes default {default}")]
    SpecialBeforeDefault {
        /// The offending act.
        act: String,
        /// The special directive's start.
        special: chrono::NaiveDate,
        /// The act's default start.
        default: chrono::NaiveDate,
    },

    /// A special enforcement directive carries a repeal date.
    #[error("act {0}: special enforcement dates cannot carry a repeal date")]
    SpecialWithRepealDate(String),

    /// A relative date expression produced no valid calendar date.
    #[error("act {act}: enforcement date expression yields no valid date ({detail})")]
    InvalidDateExpression {
        /// The offending act.
        act: String,
        /// What went wrong.
        detail: String,
    },

    /// A structural amendment target could not be located in the act.
    #[error("structural amendment target not found: {0}")]
    CutPointNotFound(String),

    /// An amendment directive's shape contradicts its target
    /// (e.g. a block amendment without quoted content).
    #[error("malformed amendment: {0}")]
    MalformedAmendment(String),

    /// The document tree violated an invariant.
    #[error(transparent)]
    Structure(#[from] actdb_structure::StructureError),
}
