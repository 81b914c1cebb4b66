//! Handles: lightweight stand-ins for stored blobs.
//!
//! An act blob never embeds its articles; it embeds [`ArticleHandle`]s, so
//! an act amended in one article shares every other article blob with the
//! previous day's state. Day-state snapshots in turn hold [`ActHandle`]s
//! only.

use actdb_core::{ObjectKey, Reference};
use actdb_structure::StructuralElement;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A stored article: its content key plus the identifier needed to place
/// it without loading the blob.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleHandle {
    /// The article's identifier within its act.
    pub identifier: String,
    /// The article blob's content key.
    pub key: ObjectKey,
}

/// A top-level child of a stored act: structural headings inline, articles
/// by handle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoredActChild {
    /// A structural heading, stored inline.
    Structural(StructuralElement),
    /// An article, stored as its own blob.
    Article(ArticleHandle),
}

/// The act blob: act-level fields plus handles to the article blobs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredAct {
    /// The act's identifier.
    pub identifier: String,
    /// The act's subject line.
    pub subject: String,
    /// Publication date.
    pub publication_date: NaiveDate,
    /// Preamble text.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub preamble: String,
    /// Headings and article handles in document order.
    pub children: Vec<StoredActChild>,
    /// The dates on which this act's in-force shape can change.
    pub interesting_dates: Vec<NaiveDate>,
}

/// A stored act: content key plus the fields day-state queries need
/// without loading the blob.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActHandle {
    /// The act's identifier.
    pub identifier: String,
    /// The act blob's content key.
    pub key: ObjectKey,
    /// The dates on which this act's in-force shape can change.
    pub interesting_dates: Vec<NaiveDate>,
}

/// One cross-reference occurrence: which element cites, and what it cites.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferencePair {
    /// The citing element.
    pub from_ref: Reference,
    /// The cited position (absolute).
    pub to_ref: Reference,
}

/// All references pointing into one act, stored as a single blob.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferencePairList {
    /// The reference pairs, in indexing order.
    pub pairs: Vec<ReferencePair>,
}
