//! Semantic directives attached to SAEs.
//!
//! The external text-to-structure parser recognizes sentences like "section 5
//! enters into force on the 30th day after publication" or "in section 2 (1),
//! the text 'X' is replaced by 'Y'" and attaches them to the clause that
//! states them as typed directives. The core trusts this shape; it never
//! parses statute text itself.

use actdb_core::{Reference, TargetPosition};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A date expression in an enforcement directive, concretized against the
/// act's publication date by the enforcement resolver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnforcementDateExpr {
    /// A literal calendar date.
    Absolute(NaiveDate),
    /// N days after the act's publication.
    DaysAfterPublication { days: u32 },
    /// Day D of the M-th month after the publication month.
    DayInMonthAfterPublication { months: u32, day: u32 },
}

/// An enforcement directive: when (part of) the act enters into force.
///
/// `position: None` is the act's default directive; a `Some` position names
/// the sub-tree the directive overrides the default for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnforcementDate {
    /// Targeted sub-tree, or `None` for the act-wide default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Reference>,
    /// When enforcement begins.
    pub date: EnforcementDateExpr,
    /// A repeal date stated in the same directive, default only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repeal_date: Option<NaiveDate>,
}

/// Replace every occurrence of a string within the targeted elements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextAmendment {
    /// The elements whose text/intro/wrap-up are searched.
    pub position: Reference,
    /// The text to find.
    pub original_text: String,
    /// The text to substitute.
    pub replacement_text: String,
}

/// Replace a substring of an article's title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleTitleAmendment {
    /// The article whose title is amended.
    pub position: Reference,
    /// The text to find in the title.
    pub original_text: String,
    /// The text to substitute.
    pub replacement_text: String,
}

/// Strip an element of force.
///
/// With `text`, only that string is struck from the targeted elements (a
/// partial repeal, handled as a text replacement). Without it, the whole
/// targeted element is blanked — or, for a structural target, the heading
/// and its span are removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repeal {
    /// The repealed element(s).
    pub position: TargetPosition,
    /// The struck text for partial repeals.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// Replace or insert a contiguous run of elements with pre-built content.
///
/// The replacement content is the `BlockAmendmentContainer` child of the SAE
/// carrying this directive (the quoted block in the amending act's text).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockAmendment {
    /// Where the replacement lands.
    pub position: TargetPosition,
    /// True when nothing is removed: the content is spliced in.
    #[serde(default)]
    pub pure_insertion: bool,
}

/// Any semantic directive a SAE can carry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SemanticData {
    /// Enforcement-date directive.
    EnforcementDate(EnforcementDate),
    /// In-place text replacement.
    TextAmendment(TextAmendment),
    /// Article title substring replacement.
    ArticleTitleAmendment(ArticleTitleAmendment),
    /// Full or partial repeal.
    Repeal(Repeal),
    /// Block replacement/insertion.
    BlockAmendment(BlockAmendment),
}

impl SemanticData {
    /// The position an outgoing (amending) directive targets.
    ///
    /// `None` for enforcement directives, which act on the carrying act
    /// itself rather than on a target.
    pub fn target_position(&self) -> Option<TargetPosition> {
        match self {
            SemanticData::EnforcementDate(_) => None,
            SemanticData::TextAmendment(m) => {
                Some(TargetPosition::Reference(m.position.clone()))
            }
            SemanticData::ArticleTitleAmendment(m) => {
                Some(TargetPosition::Reference(m.position.clone()))
            }
            SemanticData::Repeal(m) => Some(m.position.clone()),
            SemanticData::BlockAmendment(m) => Some(m.position.clone()),
        }
    }
}

/// A cross-reference found in an SAE's text, possibly partial (anchored to
/// the carrying SAE's own position when resolved).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutgoingReference {
    /// The referenced position.
    pub reference: Reference,
}
