//! Counts, averages, and breakdowns over record collections.
//!
//! Averages are taken over the unfiltered base collection so summary cards stay
//! put while the user narrows the table below them.

use std::collections::BTreeMap;

use riskwatch_api_models::{Alert, AlertStatus, DepartmentSummary, Entity, RiskLevel};
use serde::Serialize;

/// Arithmetic mean of `field` over `items`; `0.0` for an empty slice.
#[must_use]
pub fn average_by<T>(items: &[T], field: impl Fn(&T) -> f64) -> f64 {
    if items.is_empty() {
        return 0.0;
    }
    let sum: f64 = items.iter().map(field).sum();
    sum / len_as_f64(items.len())
}

/// Number of entities at each risk level; every level is present.
#[must_use]
pub fn level_counts<'a>(entities: impl IntoIterator<Item = &'a Entity>) -> BTreeMap<RiskLevel, u64> {
    let mut counts: BTreeMap<RiskLevel, u64> = RiskLevel::ALL.iter().map(|level| (*level, 0)).collect();
    for entity in entities {
        *counts.entry(entity.risk_level).or_default() += 1;
    }
    counts
}

/// Entities at `HIGH` or `CRITICAL`.
#[must_use]
pub fn high_or_critical_count<'a>(entities: impl IntoIterator<Item = &'a Entity>) -> usize {
    entities
        .into_iter()
        .filter(|entity| entity.risk_level.is_elevated())
        .count()
}

/// Share of each risk level as a whole-number percentage of `entities`.
///
/// Empty input yields zero for every level.
#[must_use]
pub fn level_distribution(entities: &[Entity]) -> BTreeMap<RiskLevel, u64> {
    let total = len_as_f64(entities.len());
    level_counts(entities)
        .into_iter()
        .map(|(level, count)| {
            let share = if entities.is_empty() {
                0
            } else {
                percent(count_as_f64(count), total)
            };
            (level, share)
        })
        .collect()
}

/// Average risk score and headcount per department, sorted by department name.
#[must_use]
pub fn department_summaries(entities: &[Entity]) -> Vec<DepartmentSummary> {
    let mut groups: BTreeMap<&str, (f64, u64)> = BTreeMap::new();
    for entity in entities {
        let slot = groups.entry(entity.department.as_str()).or_default();
        slot.0 += entity.risk_score;
        slot.1 += 1;
    }
    groups
        .into_iter()
        .map(|(department, (sum, count))| DepartmentSummary {
            department: department.to_string(),
            average_risk: sum / count_as_f64(count),
            count,
        })
        .collect()
}

/// Alerts whose effective status is still `ACTIVE`.
#[must_use]
pub fn active_alert_count<'a>(alerts: impl IntoIterator<Item = &'a Alert>) -> usize {
    alerts
        .into_iter()
        .filter(|alert| alert.status() == AlertStatus::Active)
        .count()
}

/// Summary cards above the entity table.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntitySummary {
    /// Unfiltered entity count.
    pub total: usize,
    /// Rows passing the current filter.
    pub filtered: usize,
    /// `HIGH` or `CRITICAL` entities in the unfiltered set.
    pub high_risk: usize,
    /// Mean risk score over the unfiltered set.
    pub average_score: f64,
}

impl EntitySummary {
    /// Cards for `base`, with `filtered` rows currently visible.
    #[must_use]
    pub fn compute(base: &[Entity], filtered: usize) -> Self {
        Self {
            total: base.len(),
            filtered,
            high_risk: high_or_critical_count(base),
            average_score: average_by(base, |entity| entity.risk_score),
        }
    }
}

#[allow(clippy::cast_precision_loss)]
const fn len_as_f64(len: usize) -> f64 {
    len as f64
}

#[allow(clippy::cast_precision_loss)]
const fn count_as_f64(count: u64) -> f64 {
    count as f64
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn percent(part: f64, whole: f64) -> u64 {
    (part / whole * 100.0).round().max(0.0) as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{Choice, EntityFilter, ItemFilter};
    use riskwatch_api_models::Severity;
    use riskwatch_test_support::fixtures::{alert, entities_with_levels, entity};

    #[test]
    fn average_ignores_active_filter() {
        let entities = entities_with_levels(45, 25);
        let base_average = average_by(&entities, |e| e.risk_score);

        let filter = EntityFilter {
            level: Choice::Only(RiskLevel::Low),
            ..EntityFilter::default()
        };
        let visible = filter.apply(&entities).len();
        let summary = EntitySummary::compute(&entities, visible);

        assert!((summary.average_score - base_average).abs() < f64::EPSILON);
        assert_eq!(summary.total, 45);
        assert_eq!(summary.high_risk, 25);
        assert!(summary.filtered < summary.total);
    }

    #[test]
    fn average_of_empty_is_zero() {
        let empty: Vec<Entity> = Vec::new();
        assert!(average_by(&empty, |e| e.risk_score).abs() < f64::EPSILON);
    }

    #[test]
    fn level_counts_include_every_level() {
        let entities = vec![
            entity("A", "A", "IT", RiskLevel::Critical, 45.0),
            entity("B", "B", "IT", RiskLevel::High, 31.0),
            entity("C", "C", "HR", RiskLevel::High, 33.0),
        ];
        let counts = level_counts(&entities);
        assert_eq!(counts[&RiskLevel::Low], 0);
        assert_eq!(counts[&RiskLevel::High], 2);
        assert_eq!(counts[&RiskLevel::Critical], 1);
        assert_eq!(high_or_critical_count(&entities), 3);
    }

    #[test]
    fn distribution_is_percentage_of_total() {
        let entities = vec![
            entity("A", "A", "IT", RiskLevel::Low, 1.0),
            entity("B", "B", "IT", RiskLevel::Low, 2.0),
            entity("C", "C", "IT", RiskLevel::Low, 3.0),
            entity("D", "D", "IT", RiskLevel::High, 35.0),
        ];
        let distribution = level_distribution(&entities);
        assert_eq!(distribution[&RiskLevel::Low], 75);
        assert_eq!(distribution[&RiskLevel::High], 25);
        assert_eq!(distribution[&RiskLevel::Medium], 0);
        assert!(level_distribution(&[]).values().all(|share| *share == 0));
    }

    #[test]
    fn departments_are_averaged_and_sorted() {
        let entities = vec![
            entity("A", "A", "Sales", RiskLevel::Low, 10.0),
            entity("B", "B", "IT", RiskLevel::High, 30.0),
            entity("C", "C", "Sales", RiskLevel::Medium, 20.0),
        ];
        let summaries = department_summaries(&entities);
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].department, "IT");
        assert_eq!(summaries[1].department, "Sales");
        assert_eq!(summaries[1].count, 2);
        assert!((summaries[1].average_risk - 15.0).abs() < f64::EPSILON);
    }

    #[test]
    fn active_alerts_use_effective_status() {
        let mut legacy = alert("9", Severity::Low, AlertStatus::Active);
        legacy.status = None;
        legacy.is_acknowledged = true;
        let alerts = vec![
            alert("1", Severity::High, AlertStatus::Active),
            alert("2", Severity::High, AlertStatus::Resolved),
            legacy,
        ];
        assert_eq!(active_alert_count(&alerts), 1);
    }
}
