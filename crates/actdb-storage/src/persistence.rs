//! The persistence facade: typed stores, day-state snapshots, raw intake.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use actdb_core::ObjectKey;
use actdb_structure::{Act, ActChild, Article};
use chrono::{Datelike, NaiveDate};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::StorageError;
use crate::handles::{ActHandle, ArticleHandle, ReferencePairList, StoredAct, StoredActChild};
use crate::object_store::{read_gz, write_gz};
use crate::typed::{capacity, TypedStore};

const ARTICLE_CACHE: usize = 1024;
const ACT_CACHE: usize = 64;
const REFERENCE_LIST_CACHE: usize = 64;

/// Owns every store under one storage root.
#[derive(Debug)]
pub struct Persistence {
    root: PathBuf,
    articles: TypedStore<Article>,
    acts: TypedStore<StoredAct>,
    reference_lists: TypedStore<ReferencePairList>,
}

impl Persistence {
    /// All stores under `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            articles: TypedStore::new(&root, "articles", capacity(ARTICLE_CACHE)),
            acts: TypedStore::new(&root, "acts", capacity(ACT_CACHE)),
            reference_lists: TypedStore::new(&root, "reference_lists", capacity(REFERENCE_LIST_CACHE)),
            root,
        }
    }

    /// The storage root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Save one article blob.
    pub fn save_article(&self, article: &Article) -> Result<ArticleHandle, StorageError> {
        let key = self.articles.save(article)?;
        Ok(ArticleHandle {
            identifier: article.identifier.clone(),
            key,
        })
    }

    /// Load one article blob.
    pub fn load_article(&self, key: &ObjectKey) -> Result<Arc<Article>, StorageError> {
        self.articles.load(key)
    }

    /// Save an act: one blob per distinct article plus one act blob holding
    /// article handles. Articles unchanged since an earlier save hit the
    /// same keys and add no blobs.
    pub fn save_act(
        &self,
        act: &Act,
        interesting_dates: &[NaiveDate],
    ) -> Result<ActHandle, StorageError> {
        let mut children = Vec::with_capacity(act.children.len());
        for child in &act.children {
            children.push(match child {
                ActChild::Structural(element) => StoredActChild::Structural(element.clone()),
                ActChild::Article(article) => {
                    StoredActChild::Article(self.save_article(article)?)
                }
            });
        }
        let stored = StoredAct {
            identifier: act.identifier.clone(),
            subject: act.subject.clone(),
            publication_date: act.publication_date,
            preamble: act.preamble.clone(),
            children,
            interesting_dates: interesting_dates.to_vec(),
        };
        let key = self.acts.save(&stored)?;
        Ok(ActHandle {
            identifier: stored.identifier,
            key,
            interesting_dates: stored.interesting_dates,
        })
    }

    /// Load an act blob and reassemble the full tree from its article
    /// handles.
    pub fn load_act(&self, key: &ObjectKey) -> Result<Act, StorageError> {
        let stored = self.acts.load(key)?;
        let mut children = Vec::with_capacity(stored.children.len());
        for child in &stored.children {
            children.push(match child {
                StoredActChild::Structural(element) => ActChild::Structural(element.clone()),
                StoredActChild::Article(handle) => {
                    ActChild::Article(self.load_article(&handle.key)?)
                }
            });
        }
        Ok(Act {
            identifier: stored.identifier.clone(),
            subject: stored.subject.clone(),
            publication_date: stored.publication_date,
            preamble: stored.preamble.clone(),
            children,
        })
    }

    /// Save one reference-list blob.
    pub fn save_reference_list(
        &self,
        list: &ReferencePairList,
    ) -> Result<ObjectKey, StorageError> {
        self.reference_lists.save(list)
    }

    /// Load one reference-list blob.
    pub fn load_reference_list(
        &self,
        key: &ObjectKey,
    ) -> Result<Arc<ReferencePairList>, StorageError> {
        self.reference_lists.load(key)
    }

    fn state_path(&self, date: NaiveDate) -> PathBuf {
        self.root
            .join("states")
            .join(format!("{:04}", date.year()))
            .join(format!("{:02}", date.month()))
            .join(format!("{:02}.json.gz", date.day()))
    }

    /// Persist the day-state snapshot for `date`.
    pub fn save_state<T: Serialize>(&self, date: NaiveDate, state: &T) -> Result<(), StorageError> {
        let path = self.state_path(date);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        write_gz(&path, &serde_json::to_vec(state)?)
    }

    /// Load the day-state snapshot for `date`; `None` when no state has
    /// been computed for that day.
    pub fn load_state<T: DeserializeOwned>(
        &self,
        date: NaiveDate,
    ) -> Result<Option<T>, StorageError> {
        let path = self.state_path(date);
        if !path.exists() {
            return Ok(None);
        }
        let bytes = read_gz(&path)?;
        Ok(Some(serde_json::from_slice(&bytes)?))
    }

    fn raw_acts_dir(&self, date: NaiveDate) -> PathBuf {
        self.root
            .join("raw_acts")
            .join(format!("{:04}", date.year()))
            .join(format!("{:02}", date.month()))
            .join(format!("{:02}", date.day()))
    }

    /// File a raw (pre-resolver) act into the intake directory, keyed by
    /// its publication date.
    pub fn save_raw_act(&self, act: &Act) -> Result<PathBuf, StorageError> {
        let dir = self.raw_acts_dir(act.publication_date);
        fs::create_dir_all(&dir)?;
        let path = dir.join(format!("{}.json.gz", act.identifier));
        write_gz(&path, &serde_json::to_vec(act)?)?;
        Ok(path)
    }

    /// All raw acts filed under `date`, ordered by identifier. An empty
    /// intake directory (or none at all) yields an empty list.
    pub fn load_raw_acts(&self, date: NaiveDate) -> Result<Vec<Act>, StorageError> {
        let dir = self.raw_acts_dir(date);
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let mut acts = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.file_name().map_or(false, |n| {
                n.to_string_lossy().ends_with(".json.gz")
            }) {
                let bytes = read_gz(&path)?;
                acts.push(serde_json::from_slice(&bytes)?);
            }
        }
        acts.sort_by(|a: &Act, b: &Act| a.identifier.cmp(&b.identifier));
        Ok(acts)
    }
}

/// Parse a raw act from a parser-output file: gzip JSON (`.json.gz`),
/// plain JSON (`.json`), or YAML (`.yaml`/`.yml`).
pub fn read_raw_act_file(path: &Path) -> Result<Act, StorageError> {
    let name = path.to_string_lossy();
    if name.ends_with(".json.gz") || name.ends_with(".gz") {
        let bytes = read_gz(path)?;
        Ok(serde_json::from_slice(&bytes)?)
    } else if name.ends_with(".yaml") || name.ends_with(".yml") {
        let bytes = fs::read(path)?;
        Ok(serde_yaml::from_slice(&bytes)?)
    } else if name.ends_with(".json") {
        let bytes = fs::read(path)?;
        Ok(serde_json::from_slice(&bytes)?)
    } else {
        Err(StorageError::UnrecognizedRawAct(name.into_owned()))
    }
}
