//! The day-state orchestrator.
//!
//! A [`Database`] owns the storage root and computes corpus states day by
//! day. Recomputing one day loads the previous day's state, ingests the
//! raw acts filed for the day, applies every amendment whose enforcement
//! date arrived, rebuilds the reference index, and persists the resulting
//! snapshot. Days are strictly sequential: a range recomputation walks
//! the calendar one day at a time.

use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use actdb_amender::convert_act;
use actdb_storage::{read_raw_act_file, Persistence};
use chrono::NaiveDate;
use lru::LruCache;
use parking_lot::Mutex;

use crate::act_set::{ActSet, DaySnapshot};
use crate::error::DbError;
use crate::indexer;

const DAY_CACHE: usize = 16;

/// The versioned act database under one storage root.
#[derive(Debug)]
pub struct Database {
    persistence: Persistence,
    days: Mutex<LruCache<NaiveDate, ActSet>>,
}

impl Database {
    /// A database over the given storage root.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            persistence: Persistence::new(root),
            days: Mutex::new(LruCache::new(
                NonZeroUsize::new(DAY_CACHE).unwrap_or(NonZeroUsize::MIN),
            )),
        }
    }

    /// The underlying storage facade.
    pub fn persistence(&self) -> &Persistence {
        &self.persistence
    }

    /// The corpus state as of `date`; `None` when that day has never been
    /// recomputed.
    pub fn act_set_at(&self, date: NaiveDate) -> Result<Option<ActSet>, DbError> {
        if let Some(set) = self.days.lock().get(&date) {
            return Ok(Some(set.clone()));
        }
        let Some(snapshot) = self.persistence.load_state::<DaySnapshot>(date)? else {
            return Ok(None);
        };
        let set = ActSet::from_snapshot(snapshot);
        self.days.lock().put(date, set.clone());
        Ok(Some(set))
    }

    /// One act's tree as of `date`; `None` when the day has no state or
    /// the act is unknown.
    pub fn act_at(
        &self,
        identifier: &str,
        date: NaiveDate,
    ) -> Result<Option<std::sync::Arc<actdb_structure::Act>>, DbError> {
        match self.act_set_at(date)? {
            None => Ok(None),
            Some(set) => set.act(identifier, &self.persistence),
        }
    }

    /// File a raw act from a parser-output file into the intake
    /// directory. Filing the same identifier twice for one publication
    /// date is fatal.
    pub fn add_act(&self, path: &Path) -> Result<String, DbError> {
        let act = read_raw_act_file(path)?;
        let already_filed = self.persistence.load_raw_acts(act.publication_date)?;
        if already_filed.iter().any(|a| a.identifier == act.identifier) {
            return Err(DbError::DuplicateAct(act.identifier));
        }
        self.persistence.save_raw_act(&act)?;
        tracing::info!(
            act = %act.identifier,
            publication_date = %act.publication_date,
            "filed raw act"
        );
        Ok(act.identifier)
    }

    /// Recompute the corpus state for one day from the previous day's
    /// state, the day's raw intake, and the amendments in force.
    pub fn recompute_at(&self, date: NaiveDate) -> Result<(), DbError> {
        let previous = date
            .pred_opt()
            .ok_or_else(|| DbError::InvalidDate(format!("no day precedes {date}")))?;
        let mut set = self.act_set_at(previous)?.unwrap_or_default();

        for raw in self.persistence.load_raw_acts(date)? {
            let (act, interesting_dates) = convert_act(&raw)?;
            set.add_act(act, interesting_dates)?;
        }

        let identifiers: Vec<String> = set.identifiers().map(str::to_string).collect();
        let mut amended = 0usize;
        for identifier in &identifiers {
            if !set.is_interesting_date_for(identifier, date) {
                continue;
            }
            let Some(act) = set.act(identifier, &self.persistence)? else {
                continue;
            };
            amended += set
                .apply_all_modifications(&self.persistence, &act, date)?
                .len();
        }

        let stats = indexer::reindex(&mut set, &self.persistence)?;
        let snapshot = set.to_snapshot(&self.persistence)?;
        self.persistence.save_state(date, &snapshot)?;
        tracing::info!(
            %date,
            acts = set.len(),
            amended,
            references = stats.references,
            "recomputed day state"
        );
        self.days.lock().put(date, set);
        Ok(())
    }

    /// Recompute every day from `from` through `to`, inclusive, in order.
    pub fn recompute_range(&self, from: NaiveDate, to: NaiveDate) -> Result<(), DbError> {
        let mut day = from;
        while day <= to {
            self.recompute_at(day)?;
            day = day
                .succ_opt()
                .ok_or_else(|| DbError::InvalidDate(format!("no day follows {day}")))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::d;
    use actdb_core::Reference;
    use actdb_structure::{
        Act, ActChild, Article, EnforcementDate, EnforcementDateExpr, Sae, SemanticData,
        TextAmendment, NOT_ENFORCED_TEXT,
    };
    use std::sync::Arc;

    fn enforcement_article(id: &str) -> ActChild {
        ActChild::Article(Arc::new(Article {
            identifier: id.to_string(),
            title: None,
            children: vec![Sae {
                semantic_data: vec![SemanticData::EnforcementDate(EnforcementDate {
                    position: None,
                    date: EnforcementDateExpr::DaysAfterPublication { days: 1 },
                    repeal_date: None,
                })],
                ..Sae::leaf(None, "This act enters into force the day after publication.")
            }],
            metadata: None,
        }))
    }

    fn text_article(id: &str, text: &str) -> ActChild {
        ActChild::Article(Arc::new(Article {
            identifier: id.to_string(),
            title: None,
            children: vec![Sae::leaf(None, text)],
            metadata: None,
        }))
    }

    fn target_act() -> Act {
        Act {
            identifier: "2020. évi I. törvény".to_string(),
            subject: "subject".to_string(),
            publication_date: d(2020, 1, 1),
            preamble: String::new(),
            children: vec![
                text_article("1", "Some old text"),
                enforcement_article("2"),
            ],
        }
    }

    fn amending_act() -> Act {
        Act {
            identifier: "2020. évi II. törvény".to_string(),
            subject: "subject".to_string(),
            publication_date: d(2020, 1, 10),
            preamble: String::new(),
            children: vec![
                ActChild::Article(Arc::new(Article {
                    identifier: "1".to_string(),
                    title: None,
                    children: vec![Sae {
                        semantic_data: vec![SemanticData::TextAmendment(TextAmendment {
                            position: Reference::to_act("2020. évi I. törvény").article("1"),
                            original_text: "old".to_string(),
                            replacement_text: "new".to_string(),
                        })],
                        ..Sae::leaf(None, "In act I, replace old with new.")
                    }],
                    metadata: None,
                })),
                enforcement_article("2"),
            ],
        }
    }

    fn first_paragraph_text(act: &Act, article_id: &str) -> String {
        act.article(article_id)
            .unwrap()
            .children[0]
            .text()
            .unwrap()
            .to_string()
    }

    #[test]
    fn amendment_pipeline_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::new(dir.path());
        db.persistence().save_raw_act(&target_act()).unwrap();
        db.persistence().save_raw_act(&amending_act()).unwrap();

        db.recompute_range(d(2020, 1, 1), d(2020, 1, 12)).unwrap();

        // The day before the amendment enters into force: untouched.
        let before = db
            .act_at("2020. évi I. törvény", d(2020, 1, 10))
            .unwrap()
            .unwrap();
        assert_eq!(first_paragraph_text(&before, "1"), "Some old text");

        // The amendment took effect on the 11th.
        let after = db
            .act_at("2020. évi I. törvény", d(2020, 1, 11))
            .unwrap()
            .unwrap();
        assert_eq!(first_paragraph_text(&after, "1"), "Some new text");

        // The spent amending clause repealed itself the same day.
        let amender = db
            .act_at("2020. évi II. törvény", d(2020, 1, 11))
            .unwrap()
            .unwrap();
        assert_eq!(first_paragraph_text(&amender, "1"), NOT_ENFORCED_TEXT);

        // Later days carry the amended state forward.
        let later = db
            .act_at("2020. évi I. törvény", d(2020, 1, 12))
            .unwrap()
            .unwrap();
        assert_eq!(first_paragraph_text(&later, "1"), "Some new text");
    }

    #[test]
    fn duplicate_intake_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::new(dir.path());
        let path = db.persistence().save_raw_act(&target_act()).unwrap();

        assert!(matches!(db.add_act(&path), Err(DbError::DuplicateAct(_))));
    }

    #[test]
    fn uncomputed_days_have_no_state() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::new(dir.path());
        assert!(db.act_set_at(d(2020, 1, 1)).unwrap().is_none());
    }

    #[test]
    fn day_states_round_trip_through_the_cache_and_disk() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::new(dir.path());
        db.persistence().save_raw_act(&target_act()).unwrap();
        db.recompute_at(d(2020, 1, 1)).unwrap();

        // Same instance: served from the day cache.
        let cached = db.act_set_at(d(2020, 1, 1)).unwrap().unwrap();
        assert!(cached.has_act("2020. évi I. törvény"));

        // Fresh instance: served from the persisted snapshot.
        let reopened = Database::new(dir.path());
        let from_disk = reopened.act_set_at(d(2020, 1, 1)).unwrap().unwrap();
        assert!(from_disk.has_act("2020. évi I. törvény"));
    }
}
