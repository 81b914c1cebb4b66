//! Modification appliers.
//!
//! Every amendment directive extracted from an amending act becomes a
//! [`Modification`] and is applied mechanically to the target act's tree.
//! The four kinds form a closed set; there is no registry and no dynamic
//! dispatch. A modification that finds nothing to change is not an error:
//! [`ModificationSet::apply_all`] logs a warning and moves on, because
//! parser output does occasionally target text that an earlier amendment
//! already rewrote.

use std::cmp::Ordering;
use std::sync::Arc;

use actdb_core::{
    identifier_less, ComboKind, Reference, RefLevel, StructuralKind, StructuralReference,
    TargetPosition,
};
use actdb_structure::{
    Act, ActChild, Article, ArticleTitleAmendment, BlockAmendmentContainer, BlockChild,
    LastModified, Sae, SaeBody, SaeChild, SaeMetadata, SemanticData, StructureError,
    NOT_ENFORCED_TEXT,
};
use chrono::NaiveDate;

use crate::error::AmenderError;

/// One modification to apply: a directive plus the reference of the clause
/// in the amending act that stated it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Modification {
    /// The stating clause's reference in the amending act.
    pub source: Reference,
    /// What to do.
    pub kind: ModificationKind,
}

/// The closed set of modification kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModificationKind {
    /// Replace every occurrence of a string in the targeted elements'
    /// text, intro and wrap-up. Partial repeals land here too, replacing
    /// the struck text with the not-enforced marker.
    TextReplacement {
        /// The elements searched.
        position: Reference,
        /// The text to find.
        original_text: String,
        /// The substitute.
        replacement_text: String,
    },
    /// Replace a substring of an article's title.
    TitleAmendment(ArticleTitleAmendment),
    /// Strip the targeted element(s) of force.
    Repeal(TargetPosition),
    /// Replace or insert a contiguous run of elements.
    BlockAmendment {
        /// Where the content lands.
        position: TargetPosition,
        /// True when nothing is removed.
        pure_insertion: bool,
        /// The pre-built replacement content.
        content: BlockAmendmentContainer,
    },
}

impl Modification {
    /// Build a modification from a directive carried by `sae` at `source`.
    ///
    /// Enforcement directives yield `None`: they act on the carrying act
    /// itself and are consumed by the enforcement resolver instead.
    pub fn from_directive(
        source: &Reference,
        sae: &Sae,
        directive: &SemanticData,
    ) -> Result<Option<Modification>, AmenderError> {
        let kind = match directive {
            SemanticData::EnforcementDate(_) => return Ok(None),
            SemanticData::TextAmendment(m) => ModificationKind::TextReplacement {
                position: m.position.clone(),
                original_text: m.original_text.clone(),
                replacement_text: m.replacement_text.clone(),
            },
            SemanticData::ArticleTitleAmendment(m) => ModificationKind::TitleAmendment(m.clone()),
            SemanticData::Repeal(m) => match &m.text {
                Some(text) => {
                    let TargetPosition::Reference(position) = &m.position else {
                        return Err(AmenderError::MalformedAmendment(format!(
                            "partial repeal of a structural target at {source}"
                        )));
                    };
                    ModificationKind::TextReplacement {
                        position: position.clone(),
                        original_text: text.clone(),
                        replacement_text: NOT_ENFORCED_TEXT.to_string(),
                    }
                }
                None => ModificationKind::Repeal(m.position.clone()),
            },
            SemanticData::BlockAmendment(m) => {
                let content = sae.block_amendment_content().ok_or_else(|| {
                    AmenderError::MalformedAmendment(format!(
                        "block amendment without quoted content at {source}"
                    ))
                })?;
                ModificationKind::BlockAmendment {
                    position: m.position.clone(),
                    pure_insertion: m.pure_insertion,
                    content: content.clone(),
                }
            }
        };
        Ok(Some(Modification {
            source: source.clone(),
            kind,
        }))
    }

    /// Application priority; higher applies sooner.
    ///
    /// Text replacements order by pattern length so that a replacement of
    /// "ABCD" runs before a replacement of "ABC" — in the other order the
    /// shorter pattern corrupts the longer one's occurrences.
    pub fn priority(&self) -> usize {
        match &self.kind {
            ModificationKind::TextReplacement { original_text, .. } => original_text.len(),
            _ => 0,
        }
    }

    fn kind_rank(&self) -> u8 {
        match &self.kind {
            ModificationKind::TextReplacement { .. } => 0,
            ModificationKind::TitleAmendment(_) => 1,
            ModificationKind::Repeal(_) => 2,
            ModificationKind::BlockAmendment { .. } => 3,
        }
    }

    /// Apply to `act`, returning the new act and whether anything changed.
    pub fn apply(&self, act: &Act, current_date: NaiveDate) -> Result<(Act, bool), AmenderError> {
        match &self.kind {
            ModificationKind::TextReplacement {
                position,
                original_text,
                replacement_text,
            } => self.apply_text_replacement(act, position, original_text, replacement_text, current_date),
            ModificationKind::TitleAmendment(m) => apply_title_amendment(act, m),
            ModificationKind::Repeal(position) => self.apply_repeal(act, position, current_date),
            ModificationKind::BlockAmendment {
                position,
                pure_insertion,
                content,
            } => self.apply_block_amendment(act, position, *pure_insertion, content, current_date),
        }
    }

    fn touch(&self, metadata: &SaeMetadata, current_date: NaiveDate) -> SaeMetadata {
        SaeMetadata {
            enforcement: metadata.enforcement,
            last_modified: Some(LastModified {
                date: current_date,
                modified_by: self.source.clone(),
            }),
        }
    }

    fn apply_text_replacement(
        &self,
        act: &Act,
        position: &Reference,
        original_text: &str,
        replacement_text: &str,
        current_date: NaiveDate,
    ) -> Result<(Act, bool), AmenderError> {
        let mut applied = false;
        let new_act = act.map_saes(Some(position), &mut |_reference, sae| {
            let (body, changed) = match &sae.body {
                SaeBody::Text(text) => {
                    let new_text = text.replace(original_text, replacement_text);
                    let changed = new_text != *text;
                    (SaeBody::Text(new_text), changed)
                }
                SaeBody::Children {
                    intro,
                    children,
                    wrap_up,
                } => {
                    let new_intro = intro.replace(original_text, replacement_text);
                    let new_wrap_up = wrap_up.replace(original_text, replacement_text);
                    let changed = new_intro != *intro || new_wrap_up != *wrap_up;
                    (
                        SaeBody::Children {
                            intro: new_intro,
                            children: children.clone(),
                            wrap_up: new_wrap_up,
                        },
                        changed,
                    )
                }
            };
            if !changed {
                return Ok(None);
            }
            applied = true;
            // The element's text is new: whatever was parsed out of the old
            // text no longer holds.
            Ok(Some(Sae {
                identifier: sae.identifier.clone(),
                body,
                semantic_data: Vec::new(),
                outgoing_references: Vec::new(),
                metadata: Some(self.touch(sae.metadata()?, current_date)),
            }))
        })?;
        Ok((new_act, applied))
    }

    fn apply_repeal(
        &self,
        act: &Act,
        position: &TargetPosition,
        current_date: NaiveDate,
    ) -> Result<(Act, bool), AmenderError> {
        match position {
            TargetPosition::Reference(reference) => match reference.last_level() {
                None => Err(AmenderError::MalformedAmendment(format!(
                    "repeal targeting a whole act at {}",
                    self.source
                ))),
                Some((RefLevel::Article, _)) => self.repeal_articles(act, reference, current_date),
                Some(_) => self.repeal_saes(act, reference, current_date),
            },
            TargetPosition::Structural(structural) => {
                self.repeal_structural(act, structural, current_date)
            }
        }
    }

    fn repeal_articles(
        &self,
        act: &Act,
        reference: &Reference,
        current_date: NaiveDate,
    ) -> Result<(Act, bool), AmenderError> {
        let mut applied = false;
        let new_act = act.map_articles(Some(reference), &mut |_reference, article| {
            let first = article.children.first().ok_or_else(|| {
                StructureError::Malformed(format!("article {} has no paragraphs", article.identifier))
            })?;
            let mut paragraph_metadata = self.touch(first.metadata()?, current_date);
            paragraph_metadata.enforcement.to_date = Some(current_date);
            let mut article_metadata = self.touch(article.metadata()?, current_date);
            article_metadata.enforcement.to_date = Some(current_date);
            applied = true;
            // The article's identifier survives so sibling numbering never
            // shifts; only its content is blanked.
            Ok(Some(Article {
                identifier: article.identifier.clone(),
                title: None,
                children: vec![Sae {
                    identifier: None,
                    body: SaeBody::Text(NOT_ENFORCED_TEXT.to_string()),
                    semantic_data: Vec::new(),
                    outgoing_references: Vec::new(),
                    metadata: Some(paragraph_metadata),
                }],
                metadata: Some(article_metadata),
            }))
        })?;
        Ok((new_act, applied))
    }

    fn repeal_saes(
        &self,
        act: &Act,
        reference: &Reference,
        current_date: NaiveDate,
    ) -> Result<(Act, bool), AmenderError> {
        let mut applied = false;
        let new_act = act.map_saes(Some(reference), &mut |_reference, sae| {
            let mut metadata = self.touch(sae.metadata()?, current_date);
            metadata.enforcement.to_date = Some(current_date);
            applied = true;
            Ok(Some(Sae {
                identifier: sae.identifier.clone(),
                body: SaeBody::Text(NOT_ENFORCED_TEXT.to_string()),
                semantic_data: Vec::new(),
                outgoing_references: Vec::new(),
                metadata: Some(metadata),
            }))
        })?;
        Ok((new_act, applied))
    }

    fn repeal_structural(
        &self,
        act: &Act,
        position: &StructuralReference,
        _current_date: NaiveDate,
    ) -> Result<(Act, bool), AmenderError> {
        let (start_cut, end_cut) = match &position.special {
            Some(combo) => {
                if combo.combo != ComboKind::BeforeWithoutArticle {
                    return Err(AmenderError::MalformedAmendment(format!(
                        "structural repeal supports only the subtitle-before-article form, got {combo:?}"
                    )));
                }
                let end_cut = act.children.iter().position(
                    |c| matches!(c, ActChild::Article(a) if a.identifier == combo.article_id),
                );
                let Some(end_cut) = end_cut else {
                    tracing::warn!(
                        act = %act.identifier,
                        article = %combo.article_id,
                        "structural repeal anchor article not found"
                    );
                    return Ok((act.clone(), false));
                };
                if end_cut == 0 {
                    return Err(AmenderError::CutPointNotFound(format!(
                        "no subtitle precedes article {}",
                        combo.article_id
                    )));
                }
                (end_cut - 1, end_cut)
            }
            None => structural_cut_points(position, &act.children)?,
        };
        let mut children = act.children[..start_cut].to_vec();
        children.extend_from_slice(&act.children[end_cut..]);
        Ok((
            Act {
                children,
                ..act.clone()
            },
            true,
        ))
    }

    fn apply_block_amendment(
        &self,
        act: &Act,
        position: &TargetPosition,
        pure_insertion: bool,
        content: &BlockAmendmentContainer,
        current_date: NaiveDate,
    ) -> Result<(Act, bool), AmenderError> {
        let metadata = SaeMetadata {
            enforcement: actdb_structure::EnforcementInterval::starting(current_date),
            last_modified: Some(LastModified {
                date: current_date,
                modified_by: self.source.clone(),
            }),
        };
        match position {
            TargetPosition::Structural(structural) => {
                let (start_cut, end_cut) = match &structural.special {
                    Some(_) => special_cut_points(structural, pure_insertion, &act.children)?,
                    None => structural_cut_points(structural, &act.children)?,
                };
                let new_children = act_level_children(content, &metadata, &self.source)?;
                Ok((splice_act(act, start_cut, end_cut, new_children), true))
            }
            TargetPosition::Reference(reference) => match reference.last_level() {
                None => Err(AmenderError::MalformedAmendment(format!(
                    "block amendment targeting a whole act at {}",
                    self.source
                ))),
                Some((RefLevel::Article, _)) => {
                    self.splice_articles(act, reference, content, &metadata)
                }
                Some((RefLevel::Paragraph, _)) => {
                    self.splice_paragraphs(act, reference, content, &metadata)
                }
                Some((level, _)) => self.splice_points(act, reference, level, content, &metadata),
            },
        }
    }

    fn splice_articles(
        &self,
        act: &Act,
        reference: &Reference,
        content: &BlockAmendmentContainer,
        metadata: &SaeMetadata,
    ) -> Result<(Act, bool), AmenderError> {
        let parent = Reference::to_act(act.identifier.as_str());
        let slots: Vec<ChildSlot> = act
            .children
            .iter()
            .map(|child| match child {
                ActChild::Structural(_) => ChildSlot {
                    reference: None,
                    structural: true,
                },
                ActChild::Article(article) => ChildSlot {
                    reference: Some(parent.clone().article(article.identifier.as_str())),
                    structural: false,
                },
            })
            .collect();
        let (start_cut, end_cut) = reference_cut_points(reference, &slots);
        let new_children = act_level_children(content, metadata, &self.source)?;
        Ok((splice_act(act, start_cut, end_cut, new_children), true))
    }

    fn splice_paragraphs(
        &self,
        act: &Act,
        reference: &Reference,
        content: &BlockAmendmentContainer,
        metadata: &SaeMetadata,
    ) -> Result<(Act, bool), AmenderError> {
        let article_part = reference.article.clone().ok_or_else(|| {
            AmenderError::MalformedAmendment(format!(
                "paragraph-level block amendment without an article at {}",
                self.source
            ))
        })?;
        let filter = Reference {
            act: reference.act.clone(),
            article: Some(article_part),
            ..Reference::default()
        };
        let mut applied = false;
        let new_act = act.map_articles(Some(&filter), &mut |article_ref, article| {
            let slots: Vec<ChildSlot> = article
                .children
                .iter()
                .map(|sae| ChildSlot {
                    reference: Some(match &sae.identifier {
                        Some(id) => article_ref.clone().paragraph(id.as_str()),
                        None => article_ref.clone(),
                    }),
                    structural: false,
                })
                .collect();
            let (start_cut, end_cut) = reference_cut_points(reference, &slots);
            let mut children = article.children[..start_cut].to_vec();
            for child in &content.children {
                let BlockChild::Sae(sae) = child else {
                    return Err(StructureError::Malformed(
                        "paragraph-level block amendment with non-paragraph content".to_string(),
                    ));
                };
                children.push(stamp_sae(sae, metadata));
            }
            children.extend_from_slice(&article.children[end_cut..]);
            applied = true;
            Ok(Some(Article {
                children,
                ..article.clone()
            }))
        })?;
        Ok((new_act, applied))
    }

    fn splice_points(
        &self,
        act: &Act,
        reference: &Reference,
        level: RefLevel,
        content: &BlockAmendmentContainer,
        metadata: &SaeMetadata,
    ) -> Result<(Act, bool), AmenderError> {
        let parent = reference.parent();
        let mut applied = false;
        let new_act = act.map_saes(Some(&parent), &mut |sae_ref, sae| {
            if sae_ref != &parent {
                return Ok(None);
            }
            let SaeBody::Children {
                intro,
                children,
                wrap_up,
            } = &sae.body
            else {
                return Err(StructureError::Malformed(format!(
                    "block amendment target {parent} has no children"
                )));
            };
            let slots: Vec<ChildSlot> = children
                .iter()
                .map(|child| match child {
                    SaeChild::Sae(child_sae) => ChildSlot {
                        reference: child_sae.identifier.as_deref().map(|id| match level {
                            RefLevel::Subpoint => sae_ref.clone().subpoint(id),
                            _ => sae_ref.clone().point(id),
                        }),
                        structural: false,
                    },
                    _ => ChildSlot {
                        reference: None,
                        structural: false,
                    },
                })
                .collect();
            let (start_cut, end_cut) = reference_cut_points(reference, &slots);
            let mut new_children = children[..start_cut].to_vec();
            for child in &content.children {
                let BlockChild::Sae(child_sae) = child else {
                    return Err(StructureError::Malformed(
                        "point-level block amendment with non-point content".to_string(),
                    ));
                };
                new_children.push(SaeChild::Sae(stamp_sae(child_sae, metadata)));
            }
            new_children.extend_from_slice(&children[end_cut..]);
            applied = true;
            Ok(Some(Sae {
                body: SaeBody::Children {
                    intro: intro.clone(),
                    children: new_children,
                    wrap_up: wrap_up.clone(),
                },
                ..sae.clone()
            }))
        })?;
        Ok((new_act, applied))
    }
}

/// Replace a substring of the targeted articles' titles. An article without
/// a title, or whose title does not contain the pattern, is left alone.
fn apply_title_amendment(
    act: &Act,
    amendment: &ArticleTitleAmendment,
) -> Result<(Act, bool), AmenderError> {
    let mut applied = false;
    let new_act = act.map_articles(Some(&amendment.position), &mut |_reference, article| {
        let Some(title) = &article.title else {
            return Ok(None);
        };
        let new_title = title.replace(&amendment.original_text, &amendment.replacement_text);
        if new_title == *title {
            return Ok(None);
        }
        applied = true;
        Ok(Some(Article {
            title: Some(new_title),
            ..article.clone()
        }))
    })?;
    Ok((new_act, applied))
}

struct ChildSlot {
    reference: Option<Reference>,
    structural: bool,
}

/// Cut points for a (possibly ranged) tree reference over an ordered child
/// list.
///
/// The start cut is the first child at or past the range's start; the end
/// cut is the first child past its end, where a child without a reference
/// (a structural heading or quoted content) also terminates the span. A
/// degenerate span is an insertion point, and it backs up over immediately
/// preceding structural headings so inserted content lands before them.
fn reference_cut_points(position: &Reference, slots: &[ChildSlot]) -> (usize, usize) {
    let start_ref = position.first_in_range();
    let end_ref = position.last_in_range();
    let mut start_cut = slots
        .iter()
        .position(|slot| {
            slot.reference
                .as_ref()
                .is_some_and(|r| start_ref.cmp_position(r) != Ordering::Greater)
        })
        .unwrap_or(slots.len());
    let mut end_cut = slots[start_cut..]
        .iter()
        .position(|slot| match &slot.reference {
            None => true,
            Some(r) => end_ref.cmp_position(r) == Ordering::Less,
        })
        .map(|i| i + start_cut)
        .unwrap_or(slots.len());
    if start_cut == end_cut {
        while start_cut > 0 && slots[start_cut - 1].structural {
            start_cut -= 1;
            end_cut -= 1;
        }
    }
    (start_cut, end_cut)
}

/// Cut points for a structural heading addressed by identifier or title:
/// the heading itself through (exclusive) the next heading of the same or a
/// broader kind.
fn structural_cut_points(
    position: &StructuralReference,
    children: &[ActChild],
) -> Result<(usize, usize), AmenderError> {
    let target_id = position.id.as_ref().ok_or_else(|| {
        AmenderError::MalformedAmendment("structural reference without an identifier".to_string())
    })?;
    let mut search_start = 0;
    if let Some(book) = &position.book {
        search_start = children
            .iter()
            .position(|c| {
                matches!(c, ActChild::Structural(s)
                    if s.kind == StructuralKind::Book && s.identifier == *book)
            })
            .ok_or_else(|| AmenderError::CutPointNotFound(format!("book {book}")))?;
    }
    let start_cut = children[search_start..]
        .iter()
        .position(|c| {
            matches!(c, ActChild::Structural(s)
                if s.kind == position.kind
                    && (s.identifier == *target_id || s.title == *target_id))
        })
        .map(|i| i + search_start)
        .ok_or_else(|| {
            AmenderError::CutPointNotFound(format!("{:?} {target_id}", position.kind))
        })?;
    let end_cut = children[start_cut + 1..]
        .iter()
        .position(|c| {
            matches!(c, ActChild::Structural(s) if s.kind.same_or_broader(position.kind))
        })
        .map(|i| i + start_cut + 1)
        .unwrap_or(children.len());
    Ok((start_cut, end_cut))
}

/// Cut points for a subtitle position anchored to a named article
/// ("the subtitle preceding article 5", with or without the article, or
/// "following article 5").
fn special_cut_points(
    position: &StructuralReference,
    pure_insertion: bool,
    children: &[ActChild],
) -> Result<(usize, usize), AmenderError> {
    let combo = position.special.as_ref().ok_or_else(|| {
        AmenderError::MalformedAmendment("anchored cut points without an anchor".to_string())
    })?;
    let article_id = combo.article_id.as_str();
    let is_subtitle = |c: &ActChild| {
        matches!(c, ActChild::Structural(s) if s.kind == StructuralKind::Subtitle)
    };

    let mut start_cut = children
        .iter()
        .position(|c| {
            matches!(c, ActChild::Article(a) if !identifier_less(&a.identifier, article_id))
        })
        .unwrap_or(children.len());
    let article_found = matches!(
        children.get(start_cut),
        Some(ActChild::Article(a)) if a.identifier == article_id
    );
    let mut end_cut;
    if article_found {
        end_cut = start_cut + 1;
    } else {
        while start_cut > 0 && matches!(children[start_cut - 1], ActChild::Structural(_)) {
            start_cut -= 1;
        }
        end_cut = start_cut;
    }

    match combo.combo {
        ComboKind::BeforeWithArticle => {
            if article_found {
                if start_cut == 0 || !is_subtitle(&children[start_cut - 1]) {
                    return Err(AmenderError::CutPointNotFound(format!(
                        "no subtitle precedes article {article_id}"
                    )));
                }
                start_cut -= 1;
            }
        }
        ComboKind::BeforeWithoutArticle => {
            if !article_found {
                return Err(AmenderError::CutPointNotFound(format!(
                    "anchor article {article_id} not found"
                )));
            }
            if pure_insertion {
                end_cut -= 1;
            } else {
                if start_cut == 0 || !is_subtitle(&children[start_cut - 1]) {
                    return Err(AmenderError::CutPointNotFound(format!(
                        "no subtitle precedes article {article_id}"
                    )));
                }
                start_cut -= 1;
                end_cut -= 1;
            }
        }
        ComboKind::After => {
            if !article_found {
                return Err(AmenderError::CutPointNotFound(format!(
                    "anchor article {article_id} not found"
                )));
            }
            if pure_insertion {
                start_cut += 1;
            } else {
                if children.get(start_cut + 1).map_or(true, |c| !is_subtitle(c)) {
                    return Err(AmenderError::CutPointNotFound(format!(
                        "no subtitle follows article {article_id}"
                    )));
                }
                start_cut += 1;
                end_cut += 1;
            }
        }
    }
    Ok((start_cut, end_cut))
}

/// Recursively stamp a freshly inserted SAE with the amendment's metadata.
fn stamp_sae(sae: &Sae, metadata: &SaeMetadata) -> Sae {
    let body = match &sae.body {
        SaeBody::Text(text) => SaeBody::Text(text.clone()),
        SaeBody::Children {
            intro,
            children,
            wrap_up,
        } => SaeBody::Children {
            intro: intro.clone(),
            children: children
                .iter()
                .map(|child| match child {
                    SaeChild::Sae(s) => SaeChild::Sae(stamp_sae(s, metadata)),
                    other => other.clone(),
                })
                .collect(),
            wrap_up: wrap_up.clone(),
        },
    };
    Sae {
        identifier: sae.identifier.clone(),
        body,
        semantic_data: sae.semantic_data.clone(),
        outgoing_references: sae.outgoing_references.clone(),
        metadata: Some(metadata.clone()),
    }
}

/// Convert block amendment content into act-level children, stamped.
fn act_level_children(
    content: &BlockAmendmentContainer,
    metadata: &SaeMetadata,
    source: &Reference,
) -> Result<Vec<ActChild>, AmenderError> {
    let mut result = Vec::with_capacity(content.children.len());
    for child in &content.children {
        match child {
            BlockChild::Structural(element) => {
                result.push(ActChild::Structural(element.clone()));
            }
            BlockChild::Article(article) => {
                let children = article.children.iter().map(|s| stamp_sae(s, metadata)).collect();
                result.push(ActChild::Article(Arc::new(Article {
                    identifier: article.identifier.clone(),
                    title: article.title.clone(),
                    children,
                    metadata: Some(metadata.clone()),
                })));
            }
            BlockChild::Sae(_) => {
                return Err(AmenderError::MalformedAmendment(format!(
                    "act-level block amendment with bare sub-article content at {source}"
                )));
            }
        }
    }
    Ok(result)
}

fn splice_act(act: &Act, start_cut: usize, end_cut: usize, new_children: Vec<ActChild>) -> Act {
    let mut children = act.children[..start_cut].to_vec();
    children.extend(new_children);
    children.extend_from_slice(&act.children[end_cut..]);
    Act {
        children,
        ..act.clone()
    }
}

/// All modifications targeting one act on one day, in application order.
#[derive(Debug, Clone)]
pub struct ModificationSet {
    modifications: Vec<Modification>,
}

impl ModificationSet {
    /// Order `modifications` for application: descending priority, with
    /// text replacements before everything else at equal priority.
    pub fn new(mut modifications: Vec<Modification>) -> Self {
        modifications.sort_by(|a, b| {
            b.priority()
                .cmp(&a.priority())
                .then_with(|| a.kind_rank().cmp(&b.kind_rank()))
        });
        Self { modifications }
    }

    /// The modifications in application order.
    pub fn modifications(&self) -> &[Modification] {
        &self.modifications
    }

    /// Apply every modification in order. A modification that changes
    /// nothing logs a warning; only integrity violations abort.
    pub fn apply_all(&self, act: &Act, current_date: NaiveDate) -> Result<Act, AmenderError> {
        let mut act = act.clone();
        for modification in &self.modifications {
            let (next, applied) = modification.apply(&act, current_date)?;
            if !applied {
                tracing::warn!(
                    target_act = %act.identifier,
                    source = %modification.source,
                    "modification had no effect"
                );
            }
            act = next;
        }
        Ok(act)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{act_with_articles, d, stamp};
    use actdb_core::IdPart;
    use actdb_structure::StructuralElement;

    fn source() -> Reference {
        Reference::to_act("amending act").article("1")
    }

    fn text_replacement(act_id: &str, original: &str, replacement: &str) -> Modification {
        Modification {
            source: source(),
            kind: ModificationKind::TextReplacement {
                position: Reference::to_act(act_id).article("1"),
                original_text: original.to_string(),
                replacement_text: replacement.to_string(),
            },
        }
    }

    #[test]
    fn longer_patterns_replace_first() {
        let act = stamp(
            &act_with_articles(&[(
                "1",
                "This is ABC, and also ABC is important for ABCD reasons",
            )]),
            d(2020, 1, 1),
        );
        let set = ModificationSet::new(vec![
            text_replacement(&act.identifier, "ABC", "DEF"),
            text_replacement(&act.identifier, "ABCD", "DEFG"),
        ]);
        assert_eq!(set.modifications()[0].priority(), 4);
        let amended = set.apply_all(&act, d(2020, 5, 1)).unwrap();
        assert_eq!(
            amended.article("1").unwrap().children[0].text(),
            Some("This is DEF, and also DEF is important for DEFG reasons")
        );
    }

    #[test]
    fn replacement_resets_parsed_data_and_stamps_provenance() {
        let mut act = stamp(&act_with_articles(&[("1", "pay 100 forints")]), d(2020, 1, 1));
        {
            let ActChild::Article(article) = &mut act.children[0] else {
                panic!()
            };
            let article = Arc::make_mut(article);
            article.children[0].outgoing_references = vec![actdb_structure::OutgoingReference {
                reference: Reference::to_act("other act"),
            }];
        }
        let set = ModificationSet::new(vec![text_replacement(&act.identifier, "100", "200")]);
        let amended = set.apply_all(&act, d(2020, 5, 1)).unwrap();
        let sae = &amended.article("1").unwrap().children[0];
        assert_eq!(sae.text(), Some("pay 200 forints"));
        assert!(sae.outgoing_references.is_empty());
        let last_modified = sae.metadata().unwrap().last_modified.as_ref().unwrap();
        assert_eq!(last_modified.date, d(2020, 5, 1));
        assert_eq!(last_modified.modified_by, source());
    }

    #[test]
    fn missed_replacement_reports_not_applied() {
        let act = stamp(&act_with_articles(&[("1", "nothing to see")]), d(2020, 1, 1));
        let m = text_replacement(&act.identifier, "absent", "x");
        let (_, applied) = m.apply(&act, d(2020, 5, 1)).unwrap();
        assert!(!applied);
    }

    #[test]
    fn title_amendment_rewrites_only_matching_titles() {
        let mut act = stamp(&act_with_articles(&[("1", "text"), ("2", "text")]), d(2020, 1, 1));
        {
            let ActChild::Article(article) = &mut act.children[0] else {
                panic!()
            };
            Arc::make_mut(article).title = Some("On the keeping of dogs".to_string());
        }
        let m = Modification {
            source: source(),
            kind: ModificationKind::TitleAmendment(ArticleTitleAmendment {
                position: Reference::to_act(act.identifier.as_str()).article("1"),
                original_text: "dogs".to_string(),
                replacement_text: "cats".to_string(),
            }),
        };
        let (amended, applied) = m.apply(&act, d(2020, 5, 1)).unwrap();
        assert!(applied);
        assert_eq!(
            amended.article("1").unwrap().title.as_deref(),
            Some("On the keeping of cats")
        );

        // The untitled article is not a match, so nothing is applied.
        let m_untitled = Modification {
            source: source(),
            kind: ModificationKind::TitleAmendment(ArticleTitleAmendment {
                position: Reference::to_act(act.identifier.as_str()).article("2"),
                original_text: "dogs".to_string(),
                replacement_text: "cats".to_string(),
            }),
        };
        let (_, applied) = m_untitled.apply(&act, d(2020, 5, 1)).unwrap();
        assert!(!applied);
    }

    #[test]
    fn sae_repeal_blanks_but_keeps_numbering() {
        let act = stamp(
            &act_with_articles(&[("1", "keep me"), ("2", "repeal me"), ("3", "keep me too")]),
            d(2020, 1, 1),
        );
        let m = Modification {
            source: source(),
            kind: ModificationKind::Repeal(TargetPosition::Reference(
                Reference::to_act(act.identifier.as_str()).article("2"),
            )),
        };
        let (amended, applied) = m.apply(&act, d(2020, 5, 1)).unwrap();
        assert!(applied);
        let ids: Vec<_> = amended.articles().map(|a| a.identifier.clone()).collect();
        assert_eq!(ids, ["1", "2", "3"]);
        let repealed = amended.article("2").unwrap();
        assert_eq!(repealed.children.len(), 1);
        assert_eq!(repealed.children[0].text(), Some(NOT_ENFORCED_TEXT));
        assert_eq!(
            repealed.metadata().unwrap().enforcement.to_date,
            Some(d(2020, 5, 1))
        );
        assert_eq!(amended.article("1").unwrap().children[0].text(), Some("keep me"));
    }

    #[test]
    fn structural_repeal_removes_anchored_subtitle() {
        let mut act = stamp(&act_with_articles(&[("1", "one"), ("2", "two")]), d(2020, 1, 1));
        act.children.insert(
            1,
            ActChild::Structural(StructuralElement {
                kind: StructuralKind::Subtitle,
                identifier: String::new(),
                title: "Doomed heading".to_string(),
            }),
        );
        let m = Modification {
            source: source(),
            kind: ModificationKind::Repeal(TargetPosition::Structural(StructuralReference {
                act: Some(act.identifier.clone()),
                book: None,
                kind: StructuralKind::Subtitle,
                id: None,
                special: Some(actdb_core::SubtitleArticleCombo {
                    combo: ComboKind::BeforeWithoutArticle,
                    article_id: "2".to_string(),
                }),
            })),
        };
        let (amended, applied) = m.apply(&act, d(2020, 5, 1)).unwrap();
        assert!(applied);
        assert_eq!(amended.children.len(), 2);
        assert!(amended.article("2").is_some());
    }

    #[test]
    fn structural_repeal_with_missing_anchor_is_skipped() {
        let act = stamp(&act_with_articles(&[("1", "one")]), d(2020, 1, 1));
        let m = Modification {
            source: source(),
            kind: ModificationKind::Repeal(TargetPosition::Structural(StructuralReference {
                act: Some(act.identifier.clone()),
                book: None,
                kind: StructuralKind::Subtitle,
                id: None,
                special: Some(actdb_core::SubtitleArticleCombo {
                    combo: ComboKind::BeforeWithoutArticle,
                    article_id: "9".to_string(),
                }),
            })),
        };
        let (amended, applied) = m.apply(&act, d(2020, 5, 1)).unwrap();
        assert!(!applied);
        assert_eq!(amended, act);
    }

    fn block_amendment(
        act_id: &str,
        article_id: &str,
        pure_insertion: bool,
        new_articles: &[(&str, &str)],
    ) -> Modification {
        Modification {
            source: source(),
            kind: ModificationKind::BlockAmendment {
                position: TargetPosition::Reference(
                    Reference::to_act(act_id).article(article_id),
                ),
                pure_insertion,
                content: BlockAmendmentContainer {
                    children: new_articles
                        .iter()
                        .map(|(id, text)| {
                            BlockChild::Article(Article {
                                identifier: (*id).to_string(),
                                title: None,
                                children: vec![Sae::leaf(None, text)],
                                metadata: None,
                            })
                        })
                        .collect(),
                },
            },
        }
    }

    #[test]
    fn inserted_article_lands_between_neighbors() {
        let act = stamp(
            &act_with_articles(&[("5", "five"), ("6", "six")]),
            d(2020, 1, 1),
        );
        let m = block_amendment(&act.identifier, "5/A", true, &[("5/A", "five-a")]);
        let (amended, applied) = m.apply(&act, d(2020, 5, 1)).unwrap();
        assert!(applied);
        let ids: Vec<_> = amended.articles().map(|a| a.identifier.clone()).collect();
        assert_eq!(ids, ["5", "5/A", "6"]);
        let inserted = amended.article("5/A").unwrap();
        assert_eq!(
            inserted.metadata().unwrap().enforcement.from_date,
            d(2020, 5, 1)
        );
        assert_eq!(
            inserted.children[0].metadata().unwrap().enforcement.from_date,
            d(2020, 5, 1)
        );
    }

    #[test]
    fn replaced_article_range_collapses_to_new_content() {
        let act = stamp(
            &act_with_articles(&[("1", "one"), ("2", "two"), ("3", "three"), ("4", "four")]),
            d(2020, 1, 1),
        );
        let m = Modification {
            source: source(),
            kind: ModificationKind::BlockAmendment {
                position: TargetPosition::Reference(Reference::to_act(act.identifier.as_str())
                    .article(IdPart::Range("2".into(), "3".into()))),
                pure_insertion: false,
                content: BlockAmendmentContainer {
                    children: vec![BlockChild::Article(Article {
                        identifier: "2".to_string(),
                        title: None,
                        children: vec![Sae::leaf(None, "merged")],
                        metadata: None,
                    })],
                },
            },
        };
        let (amended, applied) = m.apply(&act, d(2020, 5, 1)).unwrap();
        assert!(applied);
        let ids: Vec<_> = amended.articles().map(|a| a.identifier.clone()).collect();
        assert_eq!(ids, ["1", "2", "4"]);
        assert_eq!(amended.article("2").unwrap().children[0].text(), Some("merged"));
    }

    #[test]
    fn insertion_backs_up_over_structural_headings() {
        // Inserting article 3 right where chapter II starts: the new article
        // belongs to chapter I, so it must land before the heading.
        let mut act = stamp(
            &act_with_articles(&[("1", "one"), ("2", "two"), ("4", "four")]),
            d(2020, 1, 1),
        );
        act.children.insert(
            2,
            ActChild::Structural(StructuralElement {
                kind: StructuralKind::Chapter,
                identifier: "II".to_string(),
                title: String::new(),
            }),
        );
        let m = block_amendment(&act.identifier, "3", true, &[("3", "three")]);
        let (amended, _) = m.apply(&act, d(2020, 5, 1)).unwrap();
        let kinds: Vec<String> = amended
            .children
            .iter()
            .map(|c| match c {
                ActChild::Structural(s) => format!("chapter {}", s.identifier),
                ActChild::Article(a) => format!("article {}", a.identifier),
            })
            .collect();
        assert_eq!(
            kinds,
            ["article 1", "article 2", "article 3", "chapter II", "article 4"]
        );
    }

    #[test]
    fn paragraph_level_block_amendment_replaces_in_place() {
        let mut raw = act_with_articles(&[]);
        raw.children.push(ActChild::Article(Arc::new(Article {
            identifier: "1".to_string(),
            title: None,
            children: vec![
                Sae::leaf(Some("1"), "first"),
                Sae::leaf(Some("2"), "second"),
            ],
            metadata: None,
        })));
        let act = stamp(&raw, d(2020, 1, 1));
        let m = Modification {
            source: source(),
            kind: ModificationKind::BlockAmendment {
                position: TargetPosition::Reference(
                    Reference::to_act(act.identifier.as_str()).article("1").paragraph("2"),
                ),
                pure_insertion: false,
                content: BlockAmendmentContainer {
                    children: vec![BlockChild::Sae(Sae::leaf(Some("2"), "rewritten"))],
                },
            },
        };
        let (amended, applied) = m.apply(&act, d(2020, 5, 1)).unwrap();
        assert!(applied);
        let article = amended.article("1").unwrap();
        assert_eq!(article.children.len(), 2);
        assert_eq!(article.children[1].text(), Some("rewritten"));
        assert_eq!(
            article.children[1].metadata().unwrap().enforcement.from_date,
            d(2020, 5, 1)
        );
        assert_eq!(article.children[0].text(), Some("first"));
    }
}
