//! Shared test fixtures.

use std::sync::Arc;

use actdb_structure::{Act, ActChild, Article, Sae, SaeMetadata, SemanticData};
use chrono::NaiveDate;

pub fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

/// An act published 2020-01-01 with one unnumbered paragraph per article.
pub fn act_with_articles(articles: &[(&str, &str)]) -> Act {
    Act {
        identifier: "2020. évi I. törvény".to_string(),
        subject: "subject".to_string(),
        publication_date: d(2020, 1, 1),
        preamble: String::new(),
        children: articles
            .iter()
            .map(|(id, text)| {
                ActChild::Article(Arc::new(Article {
                    identifier: (*id).to_string(),
                    title: None,
                    children: vec![Sae::leaf(None, text)],
                    metadata: None,
                }))
            })
            .collect(),
    }
}

/// Stamp every article and SAE with an open interval starting at `from_date`.
pub fn stamp(act: &Act, from_date: NaiveDate) -> Act {
    act.map_articles(None, &mut |reference, article| {
        let with_saes = article
            .map_saes(reference, None, &mut |_r, sae| {
                Ok(Some(Sae {
                    metadata: Some(SaeMetadata::starting(from_date)),
                    ..sae.clone()
                }))
            })?
            .unwrap_or_else(|| article.clone());
        Ok(Some(Article {
            metadata: Some(SaeMetadata::starting(from_date)),
            ..with_saes
        }))
    })
    .unwrap()
}

/// An article whose single paragraph carries the given directives.
pub fn leaf_with_semantics(
    article_id: &str,
    text: &str,
    semantic_data: Vec<SemanticData>,
) -> ActChild {
    ActChild::Article(Arc::new(Article {
        identifier: article_id.to_string(),
        title: None,
        children: vec![Sae {
            semantic_data,
            ..Sae::leaf(None, text)
        }],
        metadata: None,
    }))
}
