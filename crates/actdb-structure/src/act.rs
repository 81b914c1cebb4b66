//! Acts, articles and structural headings.

use std::sync::Arc;

use actdb_core::{Reference, RefLevel, StructuralKind};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::StructureError;
use crate::metadata::SaeMetadata;
use crate::sae::{extend_reference, filter_overlaps, map_sae_recursive, walk_sae_recursive, Sae};

/// A pure structural heading: a book, part, title, chapter or subtitle.
/// Headings carry no normative text of their own; they delimit spans of
/// articles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuralElement {
    /// The heading kind.
    pub kind: StructuralKind,
    /// The heading's identifier within its kind (e.g. `"IV"`, `"3"`). May be
    /// empty for unnumbered subtitles.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub identifier: String,
    /// The heading's title text.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub title: String,
}

/// An article: the atomic unit of persistence and of structural sharing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    /// The article's identifier, book-prefixed in acts that use books
    /// (e.g. `"2:1/A"`).
    pub identifier: String,
    /// The article's title, if it has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// The article's paragraphs.
    pub children: Vec<Sae>,
    /// Enforcement metadata; `None` only in raw (pre-resolver) acts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<SaeMetadata>,
}

impl Article {
    /// This article's metadata.
    ///
    /// # Errors
    ///
    /// `StructureError::MissingMetadata` if absent.
    pub fn metadata(&self) -> Result<&SaeMetadata, StructureError> {
        self.metadata
            .as_ref()
            .ok_or_else(|| StructureError::MissingMetadata(self.identifier.clone()))
    }

    /// Children-first transformation of this article's SAEs; `None` when the
    /// modifier changed nothing.
    pub fn map_saes<F>(
        &self,
        base: &Reference,
        filter: Option<&Reference>,
        f: &mut F,
    ) -> Result<Option<Article>, StructureError>
    where
        F: FnMut(&Reference, &Sae) -> Result<Option<Sae>, StructureError>,
    {
        let mut new_children: Option<Vec<Sae>> = None;
        for (i, sae) in self.children.iter().enumerate() {
            let reference = extend_reference(base, RefLevel::Paragraph, sae.identifier.as_deref());
            if let Some(flt) = filter {
                if !filter_overlaps(flt, &reference) {
                    continue;
                }
            }
            if let Some(new_sae) =
                map_sae_recursive(sae, &reference, RefLevel::Paragraph, filter, f)?
            {
                new_children.get_or_insert_with(|| self.children.clone())[i] = new_sae;
            }
        }
        Ok(new_children.map(|children| Article {
            children,
            ..self.clone()
        }))
    }

    /// Read-only visit of every SAE in this article.
    pub fn walk_saes<F>(&self, base: &Reference, f: &mut F) -> Result<(), StructureError>
    where
        F: FnMut(&Reference, &Sae) -> Result<(), StructureError>,
    {
        for sae in &self.children {
            let reference = extend_reference(base, RefLevel::Paragraph, sae.identifier.as_deref());
            walk_sae_recursive(sae, &reference, RefLevel::Paragraph, f)?;
        }
        Ok(())
    }
}

/// A top-level child of an act.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActChild {
    /// A structural heading.
    Structural(StructuralElement),
    /// An article, shared across day states when unchanged.
    Article(Arc<Article>),
}

impl ActChild {
    /// The article, if this child is one.
    pub fn as_article(&self) -> Option<&Arc<Article>> {
        match self {
            ActChild::Article(article) => Some(article),
            ActChild::Structural(_) => None,
        }
    }
}

/// A complete act.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Act {
    /// The act's identifier (e.g. `"2013. évi V. törvény"`).
    pub identifier: String,
    /// The act's subject line.
    pub subject: String,
    /// The date the act was published in the official gazette.
    pub publication_date: NaiveDate,
    /// Preamble text preceding the first structural element.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub preamble: String,
    /// Structural headings and articles, in document order.
    pub children: Vec<ActChild>,
}

impl Act {
    /// The articles of this act, in document order.
    pub fn articles(&self) -> impl Iterator<Item = &Arc<Article>> {
        self.children.iter().filter_map(ActChild::as_article)
    }

    /// Look up an article by identifier.
    pub fn article(&self, identifier: &str) -> Option<&Arc<Article>> {
        self.articles().find(|a| a.identifier == identifier)
    }

    /// The reference addressing `article` within this act.
    pub fn article_reference(&self, article: &Article) -> Reference {
        Reference::to_act(self.identifier.as_str()).article(article.identifier.as_str())
    }

    /// Transform the articles the filter's article level admits.
    ///
    /// `f` returning `None` keeps the existing `Arc`, so untouched articles
    /// stay shared with the previous tree.
    pub fn map_articles<F>(
        &self,
        filter: Option<&Reference>,
        f: &mut F,
    ) -> Result<Act, StructureError>
    where
        F: FnMut(&Reference, &Article) -> Result<Option<Article>, StructureError>,
    {
        let mut children = self.children.clone();
        for child in &mut children {
            let ActChild::Article(article) = child else {
                continue;
            };
            let reference = Reference::to_act(self.identifier.as_str())
                .article(article.identifier.as_str());
            if let Some(flt) = filter {
                if !filter_overlaps(flt, &reference) {
                    continue;
                }
            }
            if let Some(new_article) = f(&reference, article)? {
                *child = ActChild::Article(Arc::new(new_article));
            }
        }
        Ok(Act {
            children,
            ..self.clone()
        })
    }

    /// Transform the SAEs the filter contains, children first.
    pub fn map_saes<F>(&self, filter: Option<&Reference>, f: &mut F) -> Result<Act, StructureError>
    where
        F: FnMut(&Reference, &Sae) -> Result<Option<Sae>, StructureError>,
    {
        self.map_articles(filter, &mut |reference, article| {
            article.map_saes(reference, filter, f)
        })
    }

    /// Read-only visit of every SAE in the act, with its absolute reference.
    pub fn walk_saes<F>(&self, f: &mut F) -> Result<(), StructureError>
    where
        F: FnMut(&Reference, &Sae) -> Result<(), StructureError>,
    {
        for article in self.articles() {
            let base = self.article_reference(article);
            article.walk_saes(&base, f)?;
        }
        Ok(())
    }

    /// Is any article of the act in force on `date`?
    ///
    /// # Errors
    ///
    /// `StructureError::MissingMetadata` on a raw (unstamped) act.
    pub fn is_in_force(&self, date: NaiveDate) -> Result<bool, StructureError> {
        for article in self.articles() {
            if article.metadata()?.enforcement.is_in_force(date) {
                return Ok(true);
            }
        }
        Ok(false)
    }
}
