//! Sub-article elements.
//!
//! A [`Sae`] is any addressable node below the article level: a paragraph,
//! point, or subpoint — which of the three it is follows from its depth, not
//! from its type. A SAE either carries leaf text or an intro / ordered
//! children / wrap-up body; never both.

use actdb_core::{IdPart, Reference, RefLevel};
use serde::{Deserialize, Serialize};

use crate::act::{Article, StructuralElement};
use crate::error::StructureError;
use crate::metadata::SaeMetadata;
use crate::semantic::{OutgoingReference, SemanticData};

/// Verbatim quoted text (e.g. an amendment's quoted statute text rendered
/// as-is). Carries no enforcement semantics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotedBlock {
    /// The quoted lines, preserved exactly.
    pub lines: Vec<String>,
}

/// The pre-built replacement content of a block amendment, parsed from the
/// amending act's quoted text. Its children are spliced into the target act
/// when the amendment is applied; until then they are inert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockAmendmentContainer {
    /// The replacement elements.
    pub children: Vec<BlockChild>,
}

/// An element inside a block amendment's replacement content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockChild {
    /// A structural heading.
    Structural(StructuralElement),
    /// A whole article.
    Article(Article),
    /// A bare SAE (paragraph/point/subpoint level content).
    Sae(Sae),
}

/// A child of a SAE with an intro/children/wrap-up body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaeChild {
    /// A nested SAE (point under paragraph, subpoint under point).
    Sae(Sae),
    /// Quoted verbatim text.
    QuotedBlock(QuotedBlock),
    /// Block amendment replacement content.
    BlockAmendment(BlockAmendmentContainer),
}

/// The body of a SAE: leaf text, or intro + children + wrap-up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaeBody {
    /// Leaf text.
    Text(String),
    /// Intro line, ordered children, optional closing line.
    Children {
        /// Text before the child list.
        intro: String,
        /// The ordered children.
        children: Vec<SaeChild>,
        /// Text after the child list (may be empty).
        #[serde(default)]
        wrap_up: String,
    },
}

/// A sub-article element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sae {
    /// The element's identifier; a single unnumbered paragraph has none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    /// Leaf text or intro/children/wrap-up.
    pub body: SaeBody,
    /// Directives the parser attached to this element.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub semantic_data: Vec<SemanticData>,
    /// Cross-references found in this element's text.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub outgoing_references: Vec<OutgoingReference>,
    /// Enforcement metadata; `None` only in raw (pre-resolver) acts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<SaeMetadata>,
}

impl Sae {
    /// A leaf SAE with just text.
    pub fn leaf(identifier: Option<&str>, text: &str) -> Self {
        Self {
            identifier: identifier.map(str::to_string),
            body: SaeBody::Text(text.to_string()),
            semantic_data: Vec::new(),
            outgoing_references: Vec::new(),
            metadata: None,
        }
    }

    /// Leaf text, if this is a leaf.
    pub fn text(&self) -> Option<&str> {
        match &self.body {
            SaeBody::Text(t) => Some(t),
            SaeBody::Children { .. } => None,
        }
    }

    /// Intro line, if this has children.
    pub fn intro(&self) -> Option<&str> {
        match &self.body {
            SaeBody::Text(_) => None,
            SaeBody::Children { intro, .. } => Some(intro),
        }
    }

    /// Wrap-up line, if this has children.
    pub fn wrap_up(&self) -> Option<&str> {
        match &self.body {
            SaeBody::Text(_) => None,
            SaeBody::Children { wrap_up, .. } => Some(wrap_up),
        }
    }

    /// Child list, if this has children.
    pub fn children(&self) -> Option<&[SaeChild]> {
        match &self.body {
            SaeBody::Text(_) => None,
            SaeBody::Children { children, .. } => Some(children),
        }
    }

    /// This element's metadata.
    ///
    /// # Errors
    ///
    /// `StructureError::MissingMetadata` if absent — in the working
    /// representation that is a fatal integrity violation.
    pub fn metadata(&self) -> Result<&SaeMetadata, StructureError> {
        self.metadata.as_ref().ok_or_else(|| {
            StructureError::MissingMetadata(
                self.identifier.clone().unwrap_or_else(|| "<unnumbered>".to_string()),
            )
        })
    }

    /// The block amendment content carried by this SAE, if its single child
    /// is a [`BlockAmendmentContainer`].
    pub fn block_amendment_content(&self) -> Option<&BlockAmendmentContainer> {
        match self.children() {
            Some([SaeChild::BlockAmendment(container)]) => Some(container),
            _ => None,
        }
    }
}

/// The level of a SAE's own children.
pub(crate) fn child_level(level: RefLevel) -> Option<RefLevel> {
    match level {
        RefLevel::Article => Some(RefLevel::Paragraph),
        RefLevel::Paragraph => Some(RefLevel::Point),
        RefLevel::Point => Some(RefLevel::Subpoint),
        RefLevel::Subpoint => None,
    }
}

/// Extend `reference` with `id` at `level`; an unnumbered element keeps its
/// parent's reference.
pub(crate) fn extend_reference(
    reference: &Reference,
    level: RefLevel,
    id: Option<&str>,
) -> Reference {
    let Some(id) = id else {
        return reference.clone();
    };
    let part = Some(IdPart::Single(id.to_string()));
    let mut result = reference.clone();
    match level {
        RefLevel::Article => result.article = part,
        RefLevel::Paragraph => result.paragraph = part,
        RefLevel::Point => result.point = part,
        RefLevel::Subpoint => result.subpoint = part,
    }
    result
}

/// Should traversal descend toward `node` given `filter`?
///
/// True when the filter's constraints are compatible with the node being an
/// ancestor of, equal to, or inside the filtered sub-tree.
pub(crate) fn filter_overlaps(filter: &Reference, node: &Reference) -> bool {
    if let (Some(f), Some(n)) = (&filter.act, &node.act) {
        if f != n {
            return false;
        }
    }
    let pairs = [
        (&filter.article, &node.article),
        (&filter.paragraph, &node.paragraph),
        (&filter.point, &node.point),
        (&filter.subpoint, &node.subpoint),
    ];
    for (f, n) in pairs {
        match (f, n) {
            (Some(fp), Some(np)) => {
                if actdb_core::identifier_less(np.last(), fp.first())
                    || actdb_core::identifier_less(fp.last(), np.first())
                {
                    return false;
                }
            }
            // Filter exhausted: node is inside. Node shallower: keep descending.
            (None, _) | (Some(_), None) => {}
        }
    }
    true
}

/// Children-first recursive transformation of a SAE sub-tree.
///
/// `f` runs for every SAE the filter contains, after that SAE's own children
/// have been transformed. Returns `None` when nothing in the sub-tree
/// changed, so callers can keep shared structure intact.
pub(crate) fn map_sae_recursive<F>(
    sae: &Sae,
    reference: &Reference,
    level: RefLevel,
    filter: Option<&Reference>,
    f: &mut F,
) -> Result<Option<Sae>, StructureError>
where
    F: FnMut(&Reference, &Sae) -> Result<Option<Sae>, StructureError>,
{
    let mut current: Option<Sae> = None;

    if let (SaeBody::Children { intro, children, wrap_up }, Some(next_level)) =
        (&sae.body, child_level(level))
    {
        let mut new_children: Option<Vec<SaeChild>> = None;
        for (i, child) in children.iter().enumerate() {
            if let SaeChild::Sae(child_sae) = child {
                let child_ref =
                    extend_reference(reference, next_level, child_sae.identifier.as_deref());
                if filter.is_some_and(|flt| !filter_overlaps(flt, &child_ref)) {
                    continue;
                }
                if let Some(new_child) =
                    map_sae_recursive(child_sae, &child_ref, next_level, filter, f)?
                {
                    new_children
                        .get_or_insert_with(|| children.clone())[i] = SaeChild::Sae(new_child);
                }
            }
        }
        if let Some(new_children) = new_children {
            current = Some(Sae {
                body: SaeBody::Children {
                    intro: intro.clone(),
                    children: new_children,
                    wrap_up: wrap_up.clone(),
                },
                ..sae.clone()
            });
        }
    }

    let subject = current.as_ref().unwrap_or(sae);
    if filter.map_or(true, |flt| flt.contains(reference)) {
        if let Some(replaced) = f(reference, subject)? {
            return Ok(Some(replaced));
        }
    }
    Ok(current)
}

/// Read-only depth-first visit of a SAE sub-tree (this node included).
///
/// Does not descend into quoted blocks or block amendment content — those
/// are inert payload, not active law.
pub(crate) fn walk_sae_recursive<F>(
    sae: &Sae,
    reference: &Reference,
    level: RefLevel,
    f: &mut F,
) -> Result<(), StructureError>
where
    F: FnMut(&Reference, &Sae) -> Result<(), StructureError>,
{
    f(reference, sae)?;
    if let (SaeBody::Children { children, .. }, Some(next_level)) =
        (&sae.body, child_level(level))
    {
        for child in children {
            if let SaeChild::Sae(child_sae) = child {
                let child_ref =
                    extend_reference(reference, next_level, child_sae.identifier.as_deref());
                walk_sae_recursive(child_sae, &child_ref, next_level, f)?;
            }
        }
    }
    Ok(())
}
