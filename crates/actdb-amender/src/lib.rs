//! # actdb-amender — Amendment Machinery
//!
//! Turns the semantic directives carried by acts into actual tree changes:
//!
//! 1. [`enforcement`] resolves an act's enforcement-date directives and
//!    stamps every node with its in-force interval, producing the working
//!    representation from a raw parsed act.
//! 2. [`extractor`] walks a working act on a given date and collects the
//!    amendments and repeals whose carrying clause is in force, bucketed by
//!    target act, plus a synthetic self-repeal per spent amending clause.
//! 3. [`applier`] applies a day's worth of modifications to a target act:
//!    text replacements (longest pattern first), title amendments, repeals
//!    that blank content without disturbing numbering, and block amendments
//!    spliced in at computed cut points.
//!
//! Application is strictly mechanical. Nothing here interprets legal
//! meaning; a directive the machinery cannot place is either a logged
//! warning (target text already gone) or a fatal [`AmenderError`]
//! (integrity violation), never a guess.

pub mod applier;
pub mod enforcement;
pub mod error;
pub mod extractor;

#[cfg(test)]
pub(crate) mod testing;

pub use applier::{Modification, ModificationKind, ModificationSet};
pub use enforcement::{convert_act, EnforcementDateSet};
pub use error::AmenderError;
pub use extractor::extract_modifications;
