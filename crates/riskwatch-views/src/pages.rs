//! Per-page view models.
//!
//! Each model owns the last payload delivered by its poller plus any local,
//! optimistic edits. The next `replace` call discards those edits.

use std::collections::BTreeMap;

use riskwatch_api_models::{
    Alert, AlertStatus, AnalyticsData, AssessmentResult, DepartmentSummary, Entity,
    EntityRiskSnapshot, RealTimeRiskData, RiskLevel, Threat, ThreatAnalytics, ThreatBoardData,
};

use serde::Serialize;

use crate::aggregate::{self, EntitySummary};
use crate::filter::{AlertFilter, EntityFilter, ItemFilter, ThreatFilter};
use crate::normalize::{self, ListOrder, Scored};
use crate::pagination::{ListView, PageBounds};

/// Entity management page.
#[derive(Debug, Clone, Default)]
pub struct EntitiesView {
    list: ListView<Entity, EntityFilter>,
}

impl EntitiesView {
    /// Page over `entities` with `filter`.
    #[must_use]
    pub const fn new(entities: Vec<Entity>, filter: EntityFilter) -> Self {
        Self {
            list: ListView::new(entities, filter),
        }
    }

    /// Replace rows with a fresh fetch.
    pub fn replace(&mut self, entities: Vec<Entity>) {
        self.list.set_source(entities);
    }

    /// Underlying list for filtering and paging.
    pub const fn list_mut(&mut self) -> &mut ListView<Entity, EntityFilter> {
        &mut self.list
    }

    /// Underlying list.
    #[must_use]
    pub const fn list(&self) -> &ListView<Entity, EntityFilter> {
        &self.list
    }

    /// Summary cards; averages use every row regardless of the filter.
    #[must_use]
    pub fn summary(&self) -> EntitySummary {
        EntitySummary::compute(self.list.source(), self.list.filtered().len())
    }

    /// Fold an assessment into the matching row without moving the page.
    ///
    /// Returns `false` when no row has that id.
    pub fn apply_assessment(&mut self, result: &AssessmentResult) -> bool {
        let Some(entity) = self
            .list
            .source_mut()
            .iter_mut()
            .find(|entity| entity.entity_id == result.entity_id)
        else {
            return false;
        };
        entity.apply_assessment(result);
        true
    }
}

/// Alert panel.
#[derive(Debug, Clone, Default)]
pub struct AlertBoard {
    list: ListView<Alert, AlertFilter>,
}

impl AlertBoard {
    /// Board over `alerts` with `filter`.
    #[must_use]
    pub const fn new(alerts: Vec<Alert>, filter: AlertFilter) -> Self {
        Self {
            list: ListView::new(alerts, filter),
        }
    }

    /// Replace alerts with a fresh fetch, discarding local edits.
    pub fn replace(&mut self, alerts: Vec<Alert>) {
        self.list.set_source(alerts);
    }

    /// Underlying list for filtering and paging.
    pub const fn list_mut(&mut self) -> &mut ListView<Alert, AlertFilter> {
        &mut self.list
    }

    /// Underlying list.
    #[must_use]
    pub const fn list(&self) -> &ListView<Alert, AlertFilter> {
        &self.list
    }

    /// Mark an alert acknowledged locally. Only forward moves apply.
    pub fn acknowledge_local(&mut self, alert_id: &str) -> bool {
        self.transition(alert_id, AlertStatus::Acknowledged)
    }

    /// Mark an alert resolved locally. Only forward moves apply.
    pub fn resolve_local(&mut self, alert_id: &str) -> bool {
        self.transition(alert_id, AlertStatus::Resolved)
    }

    /// Alerts still active within the filtered view.
    #[must_use]
    pub fn active_count(&self) -> usize {
        aggregate::active_alert_count(self.list.filtered())
    }

    fn transition(&mut self, alert_id: &str, next: AlertStatus) -> bool {
        let Some(alert) = self
            .list
            .source_mut()
            .iter_mut()
            .find(|alert| alert.id == alert_id)
        else {
            return false;
        };
        if !alert.status().can_transition_to(next) {
            return false;
        }
        alert.status = Some(next);
        alert.is_acknowledged = true;
        true
    }
}

/// Threat detection page.
#[derive(Debug, Clone, Default)]
pub struct ThreatBoard {
    list: ListView<Threat, ThreatFilter>,
    analytics: ThreatAnalytics,
}

impl ThreatBoard {
    /// Board over a fetched payload.
    #[must_use]
    pub fn new(data: ThreatBoardData, filter: ThreatFilter) -> Self {
        Self {
            list: ListView::new(data.threats, filter),
            analytics: data.analytics,
        }
    }

    /// Replace threats and analytics with a fresh fetch.
    pub fn replace(&mut self, data: ThreatBoardData) {
        self.list.set_source(data.threats);
        self.analytics = data.analytics;
    }

    /// Underlying list.
    #[must_use]
    pub const fn list(&self) -> &ListView<Threat, ThreatFilter> {
        &self.list
    }

    /// Underlying list for filtering and paging.
    pub const fn list_mut(&mut self) -> &mut ListView<Threat, ThreatFilter> {
        &mut self.list
    }

    /// Latest analytics.
    #[must_use]
    pub const fn analytics(&self) -> &ThreatAnalytics {
        &self.analytics
    }

    /// Drop a mitigated threat from the local list.
    pub fn mark_mitigated(&mut self, threat_id: &str) -> bool {
        let threats = self.list.source_mut();
        let before = threats.len();
        threats.retain(|threat| threat.threat_id != threat_id);
        threats.len() != before
    }

    /// Visible threats with `high` or `critical` severity.
    #[must_use]
    pub fn high_severity_count(&self) -> usize {
        self.list
            .filtered()
            .iter()
            .filter(|threat| threat.severity.is_elevated())
            .count()
    }
}

/// Breakdowns shown on the analytics page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsBreakdown {
    /// Average risk per department.
    pub departments: Vec<DepartmentSummary>,
    /// Percentage of entities per level.
    pub level_distribution: BTreeMap<RiskLevel, u64>,
    /// Entities the breakdowns cover.
    pub total_entities: usize,
}

impl AnalyticsBreakdown {
    /// Derive breakdowns, preferring precomputed values when present.
    #[must_use]
    pub fn derive(data: &AnalyticsData) -> Self {
        Self {
            departments: data
                .departments
                .clone()
                .unwrap_or_else(|| aggregate::department_summaries(&data.entities)),
            level_distribution: data
                .level_distribution
                .clone()
                .unwrap_or_else(|| aggregate::level_distribution(&data.entities)),
            total_entities: data.entities.len(),
        }
    }
}

/// Live scoring pane on the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveRiskPane {
    /// One row per entity, highest combined score first.
    pub rows: Vec<EntityRiskSnapshot>,
    /// Rows whose server level is `HIGH` or `CRITICAL`.
    pub elevated: usize,
    /// Recent events received alongside the scores.
    pub event_count: usize,
}

impl LiveRiskPane {
    /// Flatten the keyed payload into ranked rows.
    #[must_use]
    pub fn derive(data: &RealTimeRiskData) -> Self {
        let rows = normalize::keyed_to_list(
            &data.risk_data.entity_risk_data,
            ListOrder::ByCombinedScoreDesc,
        );
        let elevated = rows.iter().filter(|row| row.level().is_elevated()).count();
        Self {
            rows,
            elevated,
            event_count: data.events.len(),
        }
    }
}

/// Bounds for a list, for footers.
#[must_use]
pub fn footer<T, F: ItemFilter<T>>(list: &ListView<T, F>) -> String {
    let bounds: PageBounds = list.bounds();
    if bounds.total == 0 {
        "No results".to_string()
    } else {
        format!("{} (page {} of {})", bounds.showing(), bounds.page, bounds.page_count)
    }
}
