//! Per-page payloads: the set of responses one page loads together.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{
    ActiveUsers, DashboardStats, Entity, HealthStatus, ModelAccuracy, PatternsResponse,
    RealTimeStats, RecommendationsResponse, RiskDataResponse, RiskEvent, RiskLevel,
    RiskScoresResponse, Threat, ThreatAnalytics,
};

/// Everything the dashboard page shows.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardData {
    /// Summary counters.
    pub stats: DashboardStats,
    /// Backend liveness payload.
    pub health: HealthStatus,
    /// Throughput counters.
    pub real_time: RealTimeStats,
    /// Live sessions.
    pub active_users: ActiveUsers,
    /// Live per-entity scores.
    pub risk_data: RiskDataResponse,
    /// Recent risk events.
    pub risk_events: Vec<RiskEvent>,
}

/// Live scoring pane, refreshed on the fastest interval.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RealTimeRiskData {
    /// Live per-entity scores.
    pub risk_data: RiskDataResponse,
    /// Recent risk events.
    pub events: Vec<RiskEvent>,
}

/// Live throughput pane.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RealTimeSnapshot {
    /// Throughput counters.
    pub stats: RealTimeStats,
    /// Live sessions.
    pub active_users: ActiveUsers,
}

/// Risk analysis page payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RiskAnalysisData {
    /// Per-entity model scores.
    pub scores: RiskScoresResponse,
    /// Model evaluation metrics.
    pub accuracy: ModelAccuracy,
    /// Behavioural patterns.
    pub patterns: PatternsResponse,
    /// Remediation recommendations.
    pub recommendations: RecommendationsResponse,
}

/// Threat detection page payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ThreatBoardData {
    /// Unmitigated threats.
    pub threats: Vec<Threat>,
    /// Aggregate threat metrics.
    pub analytics: ThreatAnalytics,
}

/// Average risk and headcount for one department.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentSummary {
    /// Department name.
    pub department: String,
    /// Mean risk score across the department.
    pub average_risk: f64,
    /// Number of entities.
    pub count: u64,
}

/// Analytics page payload.
///
/// `departments` and `level_distribution` are only populated by the static
/// placeholder; live data derives them from `entities`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsData {
    /// Entities the breakdowns are computed from.
    pub entities: Vec<Entity>,
    /// Model evaluation metrics.
    pub accuracy: ModelAccuracy,
    /// Aggregate threat metrics.
    pub threats: ThreatAnalytics,
    /// Precomputed department breakdown.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub departments: Option<Vec<DepartmentSummary>>,
    /// Precomputed share per risk level (percent).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level_distribution: Option<BTreeMap<RiskLevel, u64>>,
}
