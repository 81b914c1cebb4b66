//! # actdb-structure — The Document Tree
//!
//! Defines the structural model of an act: an ordered sequence of structural
//! headings (books, parts, titles, chapters, subtitles) interleaved with
//! articles, where each article owns paragraphs and each paragraph either
//! carries leaf text or an intro / children / wrap-up triple. Everything
//! below the article level is a **SAE** (sub-article element).
//!
//! ## One node type, optional metadata
//!
//! There is a single [`Sae`] type rather than a parallel "with metadata"
//! class hierarchy. A raw act (as produced by the external text-to-structure
//! parser) has `metadata: None` everywhere; the enforcement resolver stamps
//! every SAE with a [`SaeMetadata`] when converting the act into its working
//! representation. From then on the invariant holds that every SAE carries
//! metadata; [`Sae::metadata()`] returns a fatal
//! [`StructureError::MissingMetadata`] if it does not, because a working
//! tree without metadata is a data-integrity bug, not a recoverable state.
//!
//! ## Structural sharing
//!
//! Articles sit behind `Arc`. The map combinators rebuild only the path from
//! the act root to each changed node and reuse the existing `Arc` for
//! everything untouched, so a day with one amended article shares every
//! other article with the previous day's tree — which is also what lets the
//! content-addressed store deduplicate unchanged articles across days.

pub mod act;
pub mod error;
pub mod metadata;
pub mod sae;
pub mod semantic;

pub use act::{Act, ActChild, Article, StructuralElement};
pub use error::StructureError;
pub use metadata::{EnforcementInterval, LastModified, SaeMetadata};
pub use sae::{BlockAmendmentContainer, BlockChild, QuotedBlock, Sae, SaeBody, SaeChild};
pub use semantic::{
    ArticleTitleAmendment, BlockAmendment, EnforcementDate, EnforcementDateExpr,
    OutgoingReference, Repeal, SemanticData, TextAmendment,
};

/// Placeholder text of a repealed element.
///
/// Repealed articles and SAEs keep their identifier and position among their
/// siblings so that the numbering of the surrounding elements never shifts;
/// only their text is replaced with this marker.
pub const NOT_ENFORCED_TEXT: &str = " ";
