//! Amendment extraction.
//!
//! Walks an amending act and collects, per target act, the modifications
//! whose carrying clause is in force on a given date. Each extracted
//! directive also yields a synthetic repeal of its own carrying clause into
//! the amending act's bucket: an amending provision is spent the moment it
//! takes effect.

use std::collections::BTreeMap;

use actdb_core::TargetPosition;
use actdb_structure::Act;
use chrono::NaiveDate;

use crate::applier::{Modification, ModificationKind};
use crate::error::AmenderError;

/// Modifications to apply on `at_date`, keyed by target act identifier.
pub fn extract_modifications(
    act: &Act,
    at_date: NaiveDate,
) -> Result<BTreeMap<String, Vec<Modification>>, AmenderError> {
    let mut carriers = Vec::new();
    act.walk_saes(&mut |reference, sae| {
        if !sae.semantic_data.is_empty() {
            carriers.push((reference.clone(), sae.clone()));
        }
        Ok(())
    })?;

    let mut result: BTreeMap<String, Vec<Modification>> = BTreeMap::new();
    for (reference, sae) in carriers {
        if !sae.metadata()?.enforcement.is_in_force(at_date) {
            continue;
        }
        for directive in &sae.semantic_data {
            let Some(modification) = Modification::from_directive(&reference, &sae, directive)?
            else {
                continue;
            };
            let target_position = directive.target_position().ok_or_else(|| {
                AmenderError::MalformedAmendment(format!(
                    "amending directive without a target at {reference}"
                ))
            })?;
            let target_act = target_position
                .act()
                .ok_or_else(|| {
                    AmenderError::MalformedAmendment(format!(
                        "amending directive without a target act at {reference}"
                    ))
                })?
                .to_string();
            result.entry(target_act).or_default().push(modification);
            result
                .entry(act.identifier.clone())
                .or_default()
                .push(Modification {
                    source: reference.clone(),
                    kind: ModificationKind::Repeal(TargetPosition::Reference(reference.clone())),
                });
        }
    }
    Ok(result)
}
