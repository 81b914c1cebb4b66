//! Cross-reference indexing.
//!
//! Walks every act of a day and inverts its outgoing references into
//! per-target-act reference lists, persisted as content-addressed blobs.
//! References into acts the corpus does not contain are counted and
//! dropped rather than indexed.

use std::collections::{BTreeMap, HashMap};

use actdb_core::Reference;
use actdb_storage::{Persistence, ReferencePair, ReferencePairList};

use crate::act_set::ActSet;
use crate::error::DbError;

/// What one reindexing pass saw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReindexStats {
    /// Acts walked.
    pub acts: usize,
    /// References indexed.
    pub references: usize,
    /// References into acts absent from the corpus.
    pub dropped: usize,
}

/// Rebuild the reverse reference index of `set` from scratch.
///
/// Only references naming at least an act or an article are indexed;
/// finer-grained relative references cannot be resolved to a target act.
pub fn reindex(set: &mut ActSet, persistence: &Persistence) -> Result<ReindexStats, DbError> {
    let identifiers: Vec<String> = set.identifiers().map(str::to_string).collect();
    let mut per_target: BTreeMap<String, ReferencePairList> = BTreeMap::new();
    let mut references = 0usize;
    let mut dropped = 0usize;

    for identifier in &identifiers {
        let Some(act) = set.act(identifier, persistence)? else {
            continue;
        };
        let mut collected = Vec::new();
        act.walk_saes(&mut |reference, sae| {
            for outgoing in &sae.outgoing_references {
                let target = &outgoing.reference;
                if target.act.is_none() && target.article.is_none() {
                    continue;
                }
                collected.push(ReferencePair {
                    from_ref: reference.clone(),
                    to_ref: target.relative_to(reference),
                });
            }
            Ok(())
        })?;
        for pair in collected {
            let Some(target_act) = pair.to_ref.act.as_deref() else {
                continue;
            };
            if !set.has_act(target_act) {
                dropped += 1;
                continue;
            }
            references += 1;
            per_target
                .entry(target_act.to_string())
                .or_default()
                .pairs
                .push(pair);
        }
    }

    let mut index = BTreeMap::new();
    for (target, list) in &per_target {
        index.insert(target.clone(), persistence.save_reference_list(list)?);
    }
    set.set_reference_index(index);

    let stats = ReindexStats {
        acts: identifiers.len(),
        references,
        dropped,
    };
    tracing::info!(
        acts = stats.acts,
        references = stats.references,
        dropped = stats.dropped,
        "rebuilt reference index"
    );
    Ok(stats)
}

/// All references pointing into `identifier`, grouped by cited position
/// and ordered by document position.
pub fn incoming_references(
    set: &ActSet,
    identifier: &str,
    persistence: &Persistence,
) -> Result<Vec<(Reference, Vec<Reference>)>, DbError> {
    let Some(key) = set.reference_list_key(identifier) else {
        return Ok(Vec::new());
    };
    let list = persistence.load_reference_list(key)?;
    let mut grouped: HashMap<Reference, Vec<Reference>> = HashMap::new();
    for pair in &list.pairs {
        grouped
            .entry(pair.to_ref.clone())
            .or_default()
            .push(pair.from_ref.clone());
    }
    let mut result: Vec<(Reference, Vec<Reference>)> = grouped.into_iter().collect();
    result.sort_by(|a, b| a.0.cmp_position(&b.0));
    for (_, sources) in &mut result {
        sources.sort_by(|a, b| a.cmp_position(b));
    }
    Ok(result)
}
