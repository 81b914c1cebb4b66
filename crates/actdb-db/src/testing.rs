//! Shared test fixtures.

use std::sync::Arc;

use actdb_structure::{Act, ActChild, Article, Sae, SaeMetadata};
use chrono::NaiveDate;

pub fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

/// An act with one unnumbered paragraph per article, everything in force
/// from `published`.
pub fn simple_act(identifier: &str, articles: &[(&str, &str)], published: NaiveDate) -> Act {
    Act {
        identifier: identifier.to_string(),
        subject: "subject".to_string(),
        publication_date: published,
        preamble: String::new(),
        children: articles
            .iter()
            .map(|(id, text)| {
                ActChild::Article(Arc::new(Article {
                    identifier: (*id).to_string(),
                    title: None,
                    children: vec![Sae {
                        metadata: Some(SaeMetadata::starting(published)),
                        ..Sae::leaf(None, text)
                    }],
                    metadata: Some(SaeMetadata::starting(published)),
                }))
            })
            .collect(),
    }
}
