//! Keyed-object to list projection.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use riskwatch_api_models::{EntityRiskSnapshot, RiskLevel, RiskScoreRecord};

/// Records carrying a combined model score.
pub trait Scored {
    /// Entity the score belongs to.
    fn entity_id(&self) -> &str;
    /// Combined model score.
    fn combined_score(&self) -> f64;
    /// Server-assigned level.
    fn level(&self) -> RiskLevel;
}

impl Scored for EntityRiskSnapshot {
    fn entity_id(&self) -> &str {
        &self.entity_id
    }

    fn combined_score(&self) -> f64 {
        self.combined_risk_score
    }

    fn level(&self) -> RiskLevel {
        self.risk_level
    }
}

impl Scored for RiskScoreRecord {
    fn entity_id(&self) -> &str {
        &self.entity_id
    }

    fn combined_score(&self) -> f64 {
        self.combined_risk_score
    }

    fn level(&self) -> RiskLevel {
        self.risk_level
    }
}

/// Ordering applied when flattening a keyed collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListOrder {
    /// Whatever order the map yields; callers must not rely on it.
    #[default]
    AsReceived,
    /// Ascending by map key.
    ByKey,
    /// Highest combined score first, ties broken by key.
    ByCombinedScoreDesc,
}

/// Flatten `keyed` into a list with one row per key.
#[must_use]
pub fn keyed_to_list<T: Scored + Clone>(keyed: &BTreeMap<String, T>, order: ListOrder) -> Vec<T> {
    // BTreeMap iteration is already key-ordered.
    let mut rows: Vec<(&String, &T)> = keyed.iter().collect();
    match order {
        ListOrder::AsReceived | ListOrder::ByKey => {}
        ListOrder::ByCombinedScoreDesc => rows.sort_by(|left, right| {
            right
                .1
                .combined_score()
                .partial_cmp(&left.1.combined_score())
                .unwrap_or(Ordering::Equal)
                .then_with(|| left.0.cmp(right.0))
        }),
    }
    rows.into_iter().map(|(_, row)| row.clone()).collect()
}

/// Sort scored rows in place, highest combined score first.
pub fn sort_by_score_desc<T: Scored>(rows: &mut [T]) {
    rows.sort_by(|left, right| {
        right
            .combined_score()
            .partial_cmp(&left.combined_score())
            .unwrap_or(Ordering::Equal)
            .then_with(|| left.entity_id().cmp(right.entity_id()))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use riskwatch_api_models::Timestamp;

    fn snapshot(id: &str, score: f64) -> EntityRiskSnapshot {
        EntityRiskSnapshot {
            entity_id: id.to_string(),
            isolation_forest_score: score,
            random_forest_score: score,
            combined_risk_score: score,
            risk_level: RiskLevel::Medium,
            last_activity: Timestamp::iso("2024-05-01T10:00:00"),
            ip_address: None,
            activity_count: 0,
            failed_attempts: 0,
            recommendations: Vec::new(),
        }
    }

    fn keyed() -> BTreeMap<String, EntityRiskSnapshot> {
        [("USER002", 12.0), ("USER001", 41.0), ("USER003", 27.5)]
            .into_iter()
            .map(|(id, score)| (id.to_string(), snapshot(id, score)))
            .collect()
    }

    #[test]
    fn list_length_matches_key_count() {
        let map = keyed();
        for order in [ListOrder::AsReceived, ListOrder::ByKey, ListOrder::ByCombinedScoreDesc] {
            assert_eq!(keyed_to_list(&map, order).len(), map.len());
        }
        assert!(keyed_to_list(&BTreeMap::<String, EntityRiskSnapshot>::new(), ListOrder::ByKey).is_empty());
    }

    #[test]
    fn explicit_orders_are_applied() {
        let map = keyed();
        let by_key: Vec<_> = keyed_to_list(&map, ListOrder::ByKey)
            .into_iter()
            .map(|row| row.entity_id)
            .collect();
        assert_eq!(by_key, ["USER001", "USER002", "USER003"]);

        let by_score: Vec<_> = keyed_to_list(&map, ListOrder::ByCombinedScoreDesc)
            .into_iter()
            .map(|row| row.entity_id)
            .collect();
        assert_eq!(by_score, ["USER001", "USER003", "USER002"]);
    }

    #[test]
    fn sort_in_place_breaks_ties_by_id() {
        let mut rows = vec![snapshot("B", 10.0), snapshot("A", 10.0), snapshot("C", 30.0)];
        sort_by_score_desc(&mut rows);
        let ids: Vec<_> = rows.iter().map(|row| row.entity_id.as_str()).collect();
        assert_eq!(ids, ["C", "A", "B"]);
    }
}
