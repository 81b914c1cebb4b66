//! The set of acts making up one day's corpus state.
//!
//! Acts live in the set either as working trees (freshly ingested or
//! amended today) or as stored handles (unchanged since an earlier day).
//! Loading a stored act goes through [`Persistence`] and its caches;
//! snapshotting persists every working act back to blobs, so a day on
//! which nothing changed writes no new act blobs at all.

use std::collections::BTreeMap;
use std::sync::Arc;

use actdb_amender::{extract_modifications, ModificationSet};
use actdb_core::ObjectKey;
use actdb_structure::Act;
use actdb_storage::{ActHandle, Persistence};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::DbError;

#[derive(Debug, Clone)]
enum ActEntry {
    Working {
        act: Arc<Act>,
        interesting_dates: Vec<NaiveDate>,
    },
    Stored(ActHandle),
}

impl ActEntry {
    fn interesting_dates(&self) -> &[NaiveDate] {
        match self {
            ActEntry::Working {
                interesting_dates, ..
            } => interesting_dates,
            ActEntry::Stored(handle) => &handle.interesting_dates,
        }
    }
}

/// The serialized form of a day state: handles only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySnapshot {
    /// Every act of the day, as stored handles.
    pub acts: Vec<ActHandle>,
    /// Per-act reference-list blob keys.
    pub reference_index: Vec<(String, ObjectKey)>,
}

/// One day's corpus: acts by identifier, plus the reference index.
#[derive(Debug, Clone, Default)]
pub struct ActSet {
    entries: BTreeMap<String, ActEntry>,
    reference_index: BTreeMap<String, ObjectKey>,
}

impl ActSet {
    /// The empty corpus.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a set from a persisted snapshot.
    pub fn from_snapshot(snapshot: DaySnapshot) -> Self {
        Self {
            entries: snapshot
                .acts
                .into_iter()
                .map(|handle| (handle.identifier.clone(), ActEntry::Stored(handle)))
                .collect(),
            reference_index: snapshot.reference_index.into_iter().collect(),
        }
    }

    /// Persist every working act and return the day's snapshot.
    pub fn to_snapshot(&mut self, persistence: &Persistence) -> Result<DaySnapshot, DbError> {
        let mut acts = Vec::with_capacity(self.entries.len());
        for entry in self.entries.values_mut() {
            let handle = match entry {
                ActEntry::Stored(handle) => handle.clone(),
                ActEntry::Working {
                    act,
                    interesting_dates,
                } => {
                    let handle = persistence.save_act(act, interesting_dates)?;
                    let handle_clone = handle.clone();
                    *entry = ActEntry::Stored(handle);
                    handle_clone
                }
            };
            acts.push(handle);
        }
        Ok(DaySnapshot {
            acts,
            reference_index: self
                .reference_index
                .iter()
                .map(|(id, key)| (id.clone(), key.clone()))
                .collect(),
        })
    }

    /// Add a freshly converted act.
    ///
    /// # Errors
    ///
    /// `DbError::DuplicateAct` if the identifier is already present —
    /// ingesting the same act twice is always a pipeline bug.
    pub fn add_act(
        &mut self,
        act: Act,
        interesting_dates: Vec<NaiveDate>,
    ) -> Result<(), DbError> {
        let identifier = act.identifier.clone();
        if self.entries.contains_key(&identifier) {
            return Err(DbError::DuplicateAct(identifier));
        }
        self.entries.insert(
            identifier,
            ActEntry::Working {
                act: Arc::new(act),
                interesting_dates,
            },
        );
        Ok(())
    }

    /// Is an act with this identifier present?
    pub fn has_act(&self, identifier: &str) -> bool {
        self.entries.contains_key(identifier)
    }

    /// The identifiers of every act, ordered.
    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of acts in the set.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true for the empty corpus.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Load an act's full tree (from memory for working acts, through the
    /// blob store for stored ones). `None` for unknown identifiers.
    pub fn act(
        &self,
        identifier: &str,
        persistence: &Persistence,
    ) -> Result<Option<Arc<Act>>, DbError> {
        match self.entries.get(identifier) {
            None => Ok(None),
            Some(ActEntry::Working { act, .. }) => Ok(Some(Arc::clone(act))),
            Some(ActEntry::Stored(handle)) => {
                Ok(Some(Arc::new(persistence.load_act(&handle.key)?)))
            }
        }
    }

    /// The act's interesting dates; empty for unknown identifiers.
    pub fn interesting_dates_for(&self, identifier: &str) -> &[NaiveDate] {
        self.entries
            .get(identifier)
            .map(ActEntry::interesting_dates)
            .unwrap_or(&[])
    }

    /// Can `date` change this act's in-force shape?
    pub fn is_interesting_date_for(&self, identifier: &str, date: NaiveDate) -> bool {
        self.interesting_dates_for(identifier).contains(&date)
    }

    /// Union of every act's interesting dates, sorted and deduplicated.
    pub fn interesting_dates(&self) -> Vec<NaiveDate> {
        let mut dates: Vec<NaiveDate> = self
            .entries
            .values()
            .flat_map(|e| e.interesting_dates().iter().copied())
            .collect();
        dates.sort_unstable();
        dates.dedup();
        dates
    }

    /// The acts at least partially in force on `date`, in identifier order.
    pub fn acts_in_force(
        &self,
        date: NaiveDate,
        persistence: &Persistence,
    ) -> Result<Vec<Arc<Act>>, DbError> {
        let mut result = Vec::new();
        for identifier in self.entries.keys() {
            if let Some(act) = self.act(identifier, persistence)? {
                if act.is_in_force(date)? {
                    result.push(act);
                }
            }
        }
        Ok(result)
    }

    fn replace_act(&mut self, act: Act) {
        let identifier = act.identifier.clone();
        let interesting_dates = self.interesting_dates_for(&identifier).to_vec();
        self.entries.insert(
            identifier,
            ActEntry::Working {
                act: Arc::new(act),
                interesting_dates,
            },
        );
    }

    /// Apply every modification `amending_act` carries in force on
    /// `at_date`, including the synthetic self-repeals of its spent
    /// clauses. Returns the identifiers of the acts that changed.
    pub fn apply_all_modifications(
        &mut self,
        persistence: &Persistence,
        amending_act: &Act,
        at_date: NaiveDate,
    ) -> Result<Vec<String>, DbError> {
        let extracted = extract_modifications(amending_act, at_date)?;
        let mut modified = Vec::new();
        for (act_id, modifications) in extracted {
            let Some(act) = self.act(&act_id, persistence)? else {
                continue;
            };
            if act.identifier != amending_act.identifier {
                tracing::info!(
                    target_act = %act.identifier,
                    amending_act = %amending_act.identifier,
                    "amending"
                );
            }
            let amended = ModificationSet::new(modifications).apply_all(&act, at_date)?;
            self.replace_act(amended);
            modified.push(act_id);
        }
        Ok(modified)
    }

    /// Replace the whole reference index (reindexing output).
    pub fn set_reference_index(&mut self, index: BTreeMap<String, ObjectKey>) {
        self.reference_index = index;
    }

    /// The reference-list blob key for references into `identifier`.
    pub fn reference_list_key(&self, identifier: &str) -> Option<&ObjectKey> {
        self.reference_index.get(identifier)
    }
}
