//! # Reference — Hierarchical Locators into Acts
//!
//! A [`Reference`] is a partially specified locator
//! `(act?, article?, paragraph?, point?, subpoint?)` where each level may be
//! absent, a single identifier, or an inclusive identifier range. It is the
//! addressing scheme for both amendment targets and textual cross-references.
//!
//! A [`StructuralReference`] addresses a pure structural heading
//! (Book/Part/Title/Chapter/Subtitle) instead, optionally scoped to a book
//! and optionally anchored to a named article via a
//! [`SubtitleArticleCombo`] ("the subtitle before article 5", etc.).
//!
//! Well-formed references populate levels contiguously from the top: an
//! identifier at the point level implies article and paragraph are present
//! (or the reference is relative and will be anchored with
//! [`Reference::relative_to`] before use).

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::identifier::{identifier_cmp, identifier_less};

/// One level of a reference: a single identifier or an inclusive range.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IdPart {
    /// A single identifier, e.g. `"5/A"`.
    Single(String),
    /// An inclusive identifier range, e.g. `("2", "5")`.
    Range(String, String),
}

impl IdPart {
    /// The first identifier covered by this part.
    pub fn first(&self) -> &str {
        match self {
            IdPart::Single(id) => id,
            IdPart::Range(start, _) => start,
        }
    }

    /// The last identifier covered by this part.
    pub fn last(&self) -> &str {
        match self {
            IdPart::Single(id) => id,
            IdPart::Range(_, end) => end,
        }
    }

    /// Returns true for range parts.
    pub fn is_range(&self) -> bool {
        matches!(self, IdPart::Range(..))
    }
}

impl From<&str> for IdPart {
    fn from(id: &str) -> Self {
        IdPart::Single(id.to_string())
    }
}

/// The structural classification of a reference's most specific level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RefLevel {
    /// The reference bottoms out at an article.
    Article,
    /// The reference bottoms out at a paragraph.
    Paragraph,
    /// The reference bottoms out at a point.
    Point,
    /// The reference bottoms out at a subpoint.
    Subpoint,
}

/// A hierarchical, partially specified locator into an act's tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Reference {
    /// Target act identifier, if specified.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub act: Option<String>,
    /// Article level.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub article: Option<IdPart>,
    /// Paragraph level.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paragraph: Option<IdPart>,
    /// Point level.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub point: Option<IdPart>,
    /// Subpoint level.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subpoint: Option<IdPart>,
}

impl Reference {
    /// An empty (fully unspecified) reference.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A reference to a whole act.
    pub fn to_act(act: impl Into<String>) -> Self {
        Self {
            act: Some(act.into()),
            ..Self::default()
        }
    }

    /// Extend with an article identifier.
    pub fn article(mut self, id: impl Into<IdPart>) -> Self {
        self.article = Some(id.into());
        self
    }

    /// Extend with a paragraph identifier.
    pub fn paragraph(mut self, id: impl Into<IdPart>) -> Self {
        self.paragraph = Some(id.into());
        self
    }

    /// Extend with a point identifier.
    pub fn point(mut self, id: impl Into<IdPart>) -> Self {
        self.point = Some(id.into());
        self
    }

    /// Extend with a subpoint identifier.
    pub fn subpoint(mut self, id: impl Into<IdPart>) -> Self {
        self.subpoint = Some(id.into());
        self
    }

    /// Replace the act component.
    pub fn with_act(mut self, act: impl Into<String>) -> Self {
        self.act = Some(act.into());
        self
    }

    fn levels(&self) -> [&Option<IdPart>; 4] {
        [&self.article, &self.paragraph, &self.point, &self.subpoint]
    }

    /// Returns true if any level is a range.
    pub fn is_range(&self) -> bool {
        self.levels().iter().any(|l| matches!(l, Some(p) if p.is_range()))
    }

    /// Collapse every range level to its first identifier.
    pub fn first_in_range(&self) -> Reference {
        let single = |p: &Option<IdPart>| p.as_ref().map(|p| IdPart::Single(p.first().to_string()));
        Reference {
            act: self.act.clone(),
            article: single(&self.article),
            paragraph: single(&self.paragraph),
            point: single(&self.point),
            subpoint: single(&self.subpoint),
        }
    }

    /// Collapse every range level to its last identifier.
    pub fn last_in_range(&self) -> Reference {
        let single = |p: &Option<IdPart>| p.as_ref().map(|p| IdPart::Single(p.last().to_string()));
        Reference {
            act: self.act.clone(),
            article: single(&self.article),
            paragraph: single(&self.paragraph),
            point: single(&self.point),
            subpoint: single(&self.subpoint),
        }
    }

    /// Containment test: does `self` cover `other`?
    ///
    /// A reference covers another when every level it specifies encloses the
    /// other's corresponding level (by identifier range), and the other is at
    /// least as specific. A reference with fewer levels covers everything
    /// beneath its deepest specified level.
    pub fn contains(&self, other: &Reference) -> bool {
        if let Some(act) = &self.act {
            if other.act.as_deref() != Some(act.as_str()) {
                return false;
            }
        }
        for (mine, theirs) in self.levels().into_iter().zip(other.levels()) {
            match (mine, theirs) {
                (None, _) => return true,
                (Some(m), Some(t)) => {
                    if identifier_less(t.first(), m.first()) || identifier_less(m.last(), t.last())
                    {
                        return false;
                    }
                }
                (Some(_), None) => return false,
            }
        }
        true
    }

    /// Anchor a partial reference onto `base`.
    ///
    /// Levels above the highest level `self` specifies are inherited from
    /// `base`; from that level down, `self` wins. A reference that already
    /// names an act is absolute and returned unchanged.
    pub fn relative_to(&self, base: &Reference) -> Reference {
        if self.act.is_some() {
            return self.clone();
        }
        let mut result = self.clone();
        result.act = base.act.clone();
        if self.article.is_some() {
            return result;
        }
        result.article = base.article.clone();
        if self.paragraph.is_some() {
            return result;
        }
        result.paragraph = base.paragraph.clone();
        if self.point.is_some() {
            return result;
        }
        result.point = base.point.clone();
        result
    }

    /// The reference one level up (deepest specified level dropped).
    pub fn parent(&self) -> Reference {
        let mut result = self.clone();
        if result.subpoint.take().is_some() {
            return result;
        }
        if result.point.take().is_some() {
            return result;
        }
        if result.paragraph.take().is_some() {
            return result;
        }
        result.article = None;
        result
    }

    /// The most specific populated level, with its identifier part.
    pub fn last_level(&self) -> Option<(RefLevel, &IdPart)> {
        if let Some(p) = &self.subpoint {
            return Some((RefLevel::Subpoint, p));
        }
        if let Some(p) = &self.point {
            return Some((RefLevel::Point, p));
        }
        if let Some(p) = &self.paragraph {
            return Some((RefLevel::Paragraph, p));
        }
        self.article.as_ref().map(|p| (RefLevel::Article, p))
    }

    /// Document-order comparison of two references by their first-in-range
    /// position. An unspecified level sorts before any specified one, so a
    /// parent precedes its children.
    ///
    /// Not an `Ord` impl: distinct references (e.g. a degenerate range and a
    /// single identifier) can compare equal by position.
    pub fn cmp_position(&self, other: &Reference) -> Ordering {
        match (&self.act, &other.act) {
            (Some(a), Some(b)) if a != b => return a.cmp(b),
            _ => {}
        }
        for (mine, theirs) in self.levels().into_iter().zip(other.levels()) {
            let ord = match (mine, theirs) {
                (None, None) => Ordering::Equal,
                (None, Some(_)) => Ordering::Less,
                (Some(_), None) => Ordering::Greater,
                (Some(m), Some(t)) => identifier_cmp(m.first(), t.first()),
            };
            if ord != Ordering::Equal {
                return ord;
            }
        }
        Ordering::Equal
    }
}

impl std::fmt::Display for Reference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let part = |p: &IdPart| match p {
            IdPart::Single(id) => id.clone(),
            IdPart::Range(a, b) => format!("{a}-{b}"),
        };
        let mut pieces = Vec::new();
        if let Some(act) = &self.act {
            pieces.push(act.clone());
        }
        if let Some(p) = &self.article {
            pieces.push(format!("Art. {}", part(p)));
        }
        if let Some(p) = &self.paragraph {
            pieces.push(format!("({})", part(p)));
        }
        if let Some(p) = &self.point {
            pieces.push(format!("{})", part(p)));
        }
        if let Some(p) = &self.subpoint {
            pieces.push(format!("{})", part(p)));
        }
        f.write_str(&pieces.join(" "))
    }
}

/// The kinds of pure structural headings, from broadest to narrowest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StructuralKind {
    /// Top-level book.
    Book,
    /// Part within a book.
    Part,
    /// Title within a part.
    Title,
    /// Chapter within a title.
    Chapter,
    /// Subtitle: the bold heading immediately above a run of articles.
    Subtitle,
}

impl StructuralKind {
    /// Nesting rank; lower is broader.
    pub fn rank(self) -> u8 {
        match self {
            StructuralKind::Book => 0,
            StructuralKind::Part => 1,
            StructuralKind::Title => 2,
            StructuralKind::Chapter => 3,
            StructuralKind::Subtitle => 4,
        }
    }

    /// Returns true if `self` is the same kind as `other` or encloses it.
    pub fn same_or_broader(self, other: StructuralKind) -> bool {
        self.rank() <= other.rank()
    }
}

/// How a subtitle anchors to a named article.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComboKind {
    /// "The subtitle preceding article X, together with the article."
    BeforeWithArticle,
    /// "The subtitle preceding article X" (the article stays).
    BeforeWithoutArticle,
    /// "The subtitle following article X."
    After,
}

/// A subtitle position expressed relative to a named article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubtitleArticleCombo {
    /// Anchor placement relative to the article.
    pub combo: ComboKind,
    /// The anchor article's identifier.
    pub article_id: String,
}

/// A locator for a pure structural heading and the span it governs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuralReference {
    /// Target act identifier, if specified.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub act: Option<String>,
    /// Book scope for the identifier lookup, if the act uses books.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub book: Option<String>,
    /// The kind of heading addressed.
    pub kind: StructuralKind,
    /// The heading's identifier or title text. Absent for anchored
    /// (`special`) subtitle positions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Article-anchored subtitle position, replacing the id lookup.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special: Option<SubtitleArticleCombo>,
}

/// An amendment target: either a tree reference or a structural heading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetPosition {
    /// Target addressed through the article/paragraph/point/subpoint tree.
    Reference(Reference),
    /// Target addressed as a structural heading span.
    Structural(StructuralReference),
}

impl TargetPosition {
    /// The act this position targets, if specified.
    pub fn act(&self) -> Option<&str> {
        match self {
            TargetPosition::Reference(r) => r.act.as_deref(),
            TargetPosition::Structural(s) => s.act.as_deref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(act: &str) -> Reference {
        Reference::to_act(act)
    }

    #[test]
    fn contains_exact_and_deeper() {
        let target = r("X").article("1").paragraph("1");
        assert!(target.contains(&target));
        assert!(target.contains(&r("X").article("1").paragraph("1").point("a")));
        assert!(!target.contains(&r("X").article("1")));
        assert!(!target.contains(&r("X").article("1").paragraph("2")));
        assert!(!target.contains(&r("Y").article("1").paragraph("1")));
    }

    #[test]
    fn contains_ranges() {
        let target = r("X").article(IdPart::Range("2".into(), "5".into()));
        assert!(target.contains(&r("X").article("2")));
        assert!(target.contains(&r("X").article("3").paragraph("1")));
        assert!(target.contains(&r("X").article("4/A")));
        assert!(!target.contains(&r("X").article("6")));
        assert!(!target.contains(&r("X").article("1")));
    }

    #[test]
    fn act_unspecified_matches_any_act() {
        let target = Reference::empty().article("5");
        assert!(target.contains(&r("X").article("5")));
    }

    #[test]
    fn relative_to_anchors_partial_levels() {
        let base = r("X").article("2").paragraph("1");
        let partial = Reference::empty().point("a");
        let absolute = partial.relative_to(&base);
        assert_eq!(absolute, r("X").article("2").paragraph("1").point("a"));
    }

    #[test]
    fn relative_to_keeps_absolute_references() {
        let base = r("X").article("2");
        let absolute = r("Y").article("9");
        assert_eq!(absolute.relative_to(&base), absolute);
    }

    #[test]
    fn relative_to_does_not_leak_deeper_base_levels() {
        let base = r("X").article("2").paragraph("1").point("a");
        let partial = Reference::empty().article("7");
        assert_eq!(partial.relative_to(&base), r("X").article("7"));
    }

    #[test]
    fn range_endpoints() {
        let range = r("X").article(IdPart::Range("2".into(), "5".into()));
        assert!(range.is_range());
        assert_eq!(range.first_in_range(), r("X").article("2"));
        assert_eq!(range.last_in_range(), r("X").article("5"));
    }

    #[test]
    fn parent_drops_deepest_level() {
        let full = r("X").article("1").paragraph("2").point("a").subpoint("ab");
        assert_eq!(full.parent(), r("X").article("1").paragraph("2").point("a"));
        assert_eq!(r("X").article("1").parent(), r("X"));
    }

    #[test]
    fn last_level_classification() {
        assert_eq!(
            r("X").article("1").last_level().map(|(l, _)| l),
            Some(RefLevel::Article)
        );
        assert_eq!(
            r("X").article("1").paragraph("2").point("a").last_level().map(|(l, _)| l),
            Some(RefLevel::Point)
        );
        assert_eq!(r("X").last_level().map(|(l, _)| l), None);
    }

    #[test]
    fn position_ordering() {
        let a5 = r("X").article("5");
        let a5a = r("X").article("5/A");
        let a6 = r("X").article("6");
        assert_eq!(a5.cmp_position(&a5a), Ordering::Less);
        assert_eq!(a5a.cmp_position(&a6), Ordering::Less);
        assert_eq!(a6.cmp_position(&a5), Ordering::Greater);
        // A parent sorts before its children.
        assert_eq!(a5.cmp_position(&r("X").article("5").paragraph("1")), Ordering::Less);
    }

    #[test]
    fn serde_single_and_range_parts() {
        let reference = r("X").article(IdPart::Range("2".into(), "5".into())).paragraph("1");
        let json = serde_json::to_value(&reference).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"act": "X", "article": ["2", "5"], "paragraph": "1"})
        );
        let back: Reference = serde_json::from_value(json).unwrap();
        assert_eq!(back, reference);
    }

    #[test]
    fn structural_kind_ranking() {
        assert!(StructuralKind::Book.same_or_broader(StructuralKind::Subtitle));
        assert!(StructuralKind::Chapter.same_or_broader(StructuralKind::Chapter));
        assert!(!StructuralKind::Subtitle.same_or_broader(StructuralKind::Book));
    }

    #[test]
    fn target_position_serde() {
        let pos = TargetPosition::Structural(StructuralReference {
            act: Some("X".into()),
            book: None,
            kind: StructuralKind::Chapter,
            id: Some("IV".into()),
            special: None,
        });
        let json = serde_json::to_string(&pos).unwrap();
        let back: TargetPosition = serde_json::from_str(&json).unwrap();
        assert_eq!(back, pos);
        assert_eq!(pos.act(), Some("X"));
    }
}
