//! Per-node enforcement metadata.
//!
//! Every article and SAE in the working representation carries a resolved
//! enforcement interval plus optional best-effort provenance. Raw acts
//! arriving from the parser carry none; the enforcement resolver stamps them.

use actdb_core::Reference;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A resolved enforcement interval.
///
/// `from_date` is always defined once resolved; `to_date`, if present, is
/// `>= from_date`. The interval is inclusive on both ends: a repealed
/// element is still in force on its `to_date`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EnforcementInterval {
    /// First day the element's content is in force.
    pub from_date: NaiveDate,
    /// Last day in force, if the element has been repealed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_date: Option<NaiveDate>,
}

impl EnforcementInterval {
    /// An interval starting at `from_date` with no end.
    pub fn starting(from_date: NaiveDate) -> Self {
        Self {
            from_date,
            to_date: None,
        }
    }

    /// Is the element's content in force on `date`?
    pub fn is_in_force(&self, date: NaiveDate) -> bool {
        if date < self.from_date {
            return false;
        }
        match self.to_date {
            Some(to) => date <= to,
            None => true,
        }
    }
}

/// Best-effort provenance: when and by what an element was last amended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastModified {
    /// The date the amendment took effect.
    pub date: NaiveDate,
    /// The amending clause's own reference.
    pub modified_by: Reference,
}

/// The metadata block every working article/SAE must carry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaeMetadata {
    /// Resolved enforcement interval.
    pub enforcement: EnforcementInterval,
    /// Provenance of the last amendment, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<LastModified>,
}

impl SaeMetadata {
    /// Metadata with just an open-ended enforcement interval.
    pub fn starting(from_date: NaiveDate) -> Self {
        Self {
            enforcement: EnforcementInterval::starting(from_date),
            last_modified: None,
        }
    }
}
