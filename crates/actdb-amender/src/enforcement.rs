//! Enforcement-date resolution.
//!
//! A raw act states when its parts enter into force as directives scattered
//! through its text: exactly one act-wide default, plus any number of
//! "special" directives overriding the default for a sub-tree.
//! [`EnforcementDateSet`] collects and validates them, concretizes relative
//! date expressions against the publication date, and stamps every article
//! and SAE with its resolved [`EnforcementInterval`].

use actdb_core::Reference;
use actdb_structure::{
    Act, Article, EnforcementDateExpr, EnforcementInterval, Sae, SaeMetadata, SemanticData,
};
use chrono::{Datelike, Days, NaiveDate};

use crate::error::AmenderError;

/// Concretize a date expression against the act's publication date.
fn resolve_expr(
    expr: &EnforcementDateExpr,
    publication_date: NaiveDate,
    act: &str,
) -> Result<NaiveDate, AmenderError> {
    match expr {
        EnforcementDateExpr::Absolute(date) => Ok(*date),
        EnforcementDateExpr::DaysAfterPublication { days } => publication_date
            .checked_add_days(Days::new(u64::from(*days)))
            .ok_or_else(|| AmenderError::InvalidDateExpression {
                act: act.to_string(),
                detail: format!("{days} days after {publication_date}"),
            }),
        EnforcementDateExpr::DayInMonthAfterPublication { months, day } => {
            let total = publication_date.month0() + months;
            let year = publication_date.year() + (total / 12) as i32;
            let month = total % 12 + 1;
            NaiveDate::from_ymd_opt(year, month, *day).ok_or_else(|| {
                AmenderError::InvalidDateExpression {
                    act: act.to_string(),
                    detail: format!("day {day} of month {month}, {year}"),
                }
            })
        }
    }
}

/// The validated, concretized enforcement directives of one act.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnforcementDateSet {
    default: EnforcementInterval,
    specials: Vec<(Reference, NaiveDate)>,
}

impl EnforcementDateSet {
    /// Collect and validate every enforcement directive of `act`.
    ///
    /// # Errors
    ///
    /// Anything other than exactly one default directive is fatal, as is a
    /// special directive starting before the default or carrying a repeal
    /// date.
    pub fn from_act(act: &Act) -> Result<Self, AmenderError> {
        let mut default: Option<EnforcementInterval> = None;
        let mut specials: Vec<(Reference, NaiveDate)> = Vec::new();
        // The walk closure can only fail with StructureError, so collect
        // first and validate after.
        let mut directives = Vec::new();
        act.walk_saes(&mut |_reference, sae| {
            for semantic in &sae.semantic_data {
                if let SemanticData::EnforcementDate(directive) = semantic {
                    directives.push(directive.clone());
                }
            }
            Ok(())
        })?;

        for directive in directives {
            let from_date = resolve_expr(&directive.date, act.publication_date, &act.identifier)?;
            match directive.position {
                None => {
                    if default.is_some() {
                        return Err(AmenderError::MultipleDefaultEnforcementDates(
                            act.identifier.clone(),
                        ));
                    }
                    default = Some(EnforcementInterval {
                        from_date,
                        to_date: directive.repeal_date,
                    });
                }
                Some(position) => {
                    if directive.repeal_date.is_some() {
                        return Err(AmenderError::SpecialWithRepealDate(act.identifier.clone()));
                    }
                    let position = position.with_act(act.identifier.as_str());
                    specials.push((position, from_date));
                }
            }
        }

        let default = default.ok_or_else(|| {
            AmenderError::MissingDefaultEnforcementDate(act.identifier.clone())
        })?;
        for (_, special_from) in &specials {
            if *special_from < default.from_date {
                return Err(AmenderError::SpecialBeforeDefault {
                    act: act.identifier.clone(),
                    special: *special_from,
                    default: default.from_date,
                });
            }
        }
        Ok(Self { default, specials })
    }

    /// The interval governing the element at `reference`.
    ///
    /// The last special directive containing the reference wins; with none,
    /// the act-wide default applies.
    pub fn applicable(&self, reference: &Reference) -> EnforcementInterval {
        let mut result = self.default;
        for (position, from_date) in &self.specials {
            if position.contains(reference) {
                result = EnforcementInterval::starting(*from_date);
            }
        }
        result
    }

    /// Every date on which this act's in-force content can change shape:
    /// the default's boundaries plus each special's start. Sorted, deduped.
    pub fn interesting_dates(&self) -> Vec<NaiveDate> {
        let mut dates = vec![self.default.from_date];
        dates.extend(self.default.to_date);
        dates.extend(self.specials.iter().map(|(_, from)| *from));
        dates.sort_unstable();
        dates.dedup();
        dates
    }

    /// Stamp every article and SAE of `act` with its resolved metadata,
    /// producing the working representation.
    pub fn stamp_act(&self, act: &Act) -> Result<Act, AmenderError> {
        let stamped = act.map_articles(None, &mut |reference, article| {
            let with_saes = article
                .map_saes(reference, None, &mut |sae_ref, sae| {
                    Ok(Some(Sae {
                        metadata: Some(SaeMetadata {
                            enforcement: self.applicable(sae_ref),
                            last_modified: sae.metadata.as_ref().and_then(|m| m.last_modified.clone()),
                        }),
                        ..sae.clone()
                    }))
                })?
                .unwrap_or_else(|| article.clone());
            Ok(Some(Article {
                metadata: Some(SaeMetadata {
                    enforcement: self.applicable(reference),
                    last_modified: article.metadata.as_ref().and_then(|m| m.last_modified.clone()),
                }),
                ..with_saes
            }))
        })?;
        Ok(stamped)
    }
}

/// Resolve `act`'s enforcement directives and stamp it, returning the
/// working act together with its interesting dates.
pub fn convert_act(act: &Act) -> Result<(Act, Vec<NaiveDate>), AmenderError> {
    let set = EnforcementDateSet::from_act(act)?;
    let stamped = set.stamp_act(act)?;
    Ok((stamped, set.interesting_dates()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{act_with_articles, d, leaf_with_semantics};
    use actdb_structure::EnforcementDate;

    fn default_directive(date: EnforcementDateExpr) -> SemanticData {
        SemanticData::EnforcementDate(EnforcementDate {
            position: None,
            date,
            repeal_date: None,
        })
    }

    #[test]
    fn relative_date_expressions_concretize() {
        let publication = d(2020, 11, 15);
        assert_eq!(
            resolve_expr(
                &EnforcementDateExpr::DaysAfterPublication { days: 30 },
                publication,
                "X"
            )
            .unwrap(),
            d(2020, 12, 15)
        );
        assert_eq!(
            resolve_expr(
                &EnforcementDateExpr::DayInMonthAfterPublication { months: 2, day: 1 },
                publication,
                "X"
            )
            .unwrap(),
            d(2021, 1, 1)
        );
        assert_eq!(
            resolve_expr(
                &EnforcementDateExpr::DayInMonthAfterPublication { months: 14, day: 5 },
                publication,
                "X"
            )
            .unwrap(),
            d(2022, 1, 5)
        );
    }

    #[test]
    fn missing_default_is_fatal() {
        let act = act_with_articles(&[("1", "no directives here")]);
        assert!(matches!(
            EnforcementDateSet::from_act(&act),
            Err(AmenderError::MissingDefaultEnforcementDate(_))
        ));
    }

    #[test]
    fn duplicate_default_is_fatal() {
        let mut act = act_with_articles(&[]);
        act.children.push(leaf_with_semantics(
            "1",
            "in force tomorrow",
            vec![
                default_directive(EnforcementDateExpr::Absolute(d(2020, 2, 1))),
                default_directive(EnforcementDateExpr::Absolute(d(2020, 3, 1))),
            ],
        ));
        assert!(matches!(
            EnforcementDateSet::from_act(&act),
            Err(AmenderError::MultipleDefaultEnforcementDates(_))
        ));
    }

    #[test]
    fn special_before_default_is_fatal() {
        let mut act = act_with_articles(&[]);
        act.children.push(leaf_with_semantics(
            "1",
            "in force",
            vec![
                default_directive(EnforcementDateExpr::Absolute(d(2020, 2, 1))),
                SemanticData::EnforcementDate(EnforcementDate {
                    position: Some(Reference::empty().article("1")),
                    date: EnforcementDateExpr::Absolute(d(2020, 1, 1)),
                    repeal_date: None,
                }),
            ],
        ));
        assert!(matches!(
            EnforcementDateSet::from_act(&act),
            Err(AmenderError::SpecialBeforeDefault { .. })
        ));
    }

    #[test]
    fn last_containing_special_wins_and_stamping_works() {
        let mut act = act_with_articles(&[("1", "alpha"), ("2", "beta")]);
        act.children.push(leaf_with_semantics(
            "3",
            "enforcement",
            vec![
                default_directive(EnforcementDateExpr::Absolute(d(2020, 2, 1))),
                SemanticData::EnforcementDate(EnforcementDate {
                    position: Some(Reference::empty().article("2")),
                    date: EnforcementDateExpr::Absolute(d(2020, 6, 1)),
                    repeal_date: None,
                }),
                SemanticData::EnforcementDate(EnforcementDate {
                    position: Some(Reference::empty().article("2")),
                    date: EnforcementDateExpr::Absolute(d(2020, 7, 1)),
                    repeal_date: None,
                }),
            ],
        ));
        let set = EnforcementDateSet::from_act(&act).unwrap();
        let stamped = set.stamp_act(&act).unwrap();
        let a1 = stamped.article("1").unwrap();
        let a2 = stamped.article("2").unwrap();
        assert_eq!(a1.metadata().unwrap().enforcement.from_date, d(2020, 2, 1));
        assert_eq!(a2.metadata().unwrap().enforcement.from_date, d(2020, 7, 1));
        assert_eq!(
            a2.children[0].metadata().unwrap().enforcement.from_date,
            d(2020, 7, 1)
        );
        assert_eq!(
            set.interesting_dates(),
            vec![d(2020, 2, 1), d(2020, 6, 1), d(2020, 7, 1)]
        );
    }
}
