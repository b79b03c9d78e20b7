#![forbid(unsafe_code)]
#![warn(
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![allow(clippy::module_name_repetitions)]
//! Shared HTTP DTOs for the risk-scoring backend.
//!
//! The backend serialises loosely typed maps, so every record here tolerates
//! missing optional fields and ignores unknown ones. Timestamps are kept as the
//! raw JSON the server produced because it mixes epoch milliseconds and ISO
//! strings depending on the endpoint.

pub mod pages;

pub use pages::{
    AnalyticsData, DashboardData, DepartmentSummary, RealTimeRiskData, RealTimeSnapshot,
    RiskAnalysisData, ThreatBoardData,
};

use std::collections::BTreeMap;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Error returned when a categorical label does not match any known variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownLabel {
    /// Kind of label that failed to parse (`risk level`, `severity`, ...).
    pub kind: &'static str,
    /// Offending value.
    pub value: String,
}

impl Display for UnknownLabel {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        write!(formatter, "unknown {} '{}'", self.kind, self.value)
    }
}

impl std::error::Error for UnknownLabel {}

/// Categorical risk band attached to an entity by the backend.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    /// Lowest band.
    Low,
    /// Elevated but not urgent.
    Medium,
    /// Requires attention.
    High,
    /// Requires immediate action.
    Critical,
}

impl RiskLevel {
    /// All levels in ascending order.
    pub const ALL: [Self; 4] = [Self::Low, Self::Medium, Self::High, Self::Critical];

    /// Wire label (`LOW`, `MEDIUM`, ...).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::Critical => "CRITICAL",
        }
    }

    /// `true` for the two bands the dashboard counts as "high risk".
    #[must_use]
    pub const fn is_elevated(self) -> bool {
        matches!(self, Self::High | Self::Critical)
    }
}

impl Display for RiskLevel {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for RiskLevel {
    type Err = UnknownLabel;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "LOW" => Ok(Self::Low),
            "MEDIUM" => Ok(Self::Medium),
            "HIGH" => Ok(Self::High),
            "CRITICAL" => Ok(Self::Critical),
            _ => Err(UnknownLabel {
                kind: "risk level",
                value: value.to_string(),
            }),
        }
    }
}

impl<'de> Deserialize<'de> for RiskLevel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

/// Severity attached to alerts and threats.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational.
    Low,
    /// Worth a look.
    Medium,
    /// Needs follow-up.
    High,
    /// Needs immediate follow-up.
    Critical,
}

impl Severity {
    /// Lowercase wire label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }

    /// `true` for `high` and `critical`.
    #[must_use]
    pub const fn is_elevated(self) -> bool {
        matches!(self, Self::High | Self::Critical)
    }
}

impl Display for Severity {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = UnknownLabel;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "critical" => Ok(Self::Critical),
            _ => Err(UnknownLabel {
                kind: "severity",
                value: value.to_string(),
            }),
        }
    }
}

impl<'de> Deserialize<'de> for Severity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

/// Lifecycle of a security alert. Transitions only move forward.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum AlertStatus {
    /// Newly raised.
    Active,
    /// Seen by an operator.
    Acknowledged,
    /// Closed.
    Resolved,
}

impl AlertStatus {
    /// Lowercase wire label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Acknowledged => "acknowledged",
            Self::Resolved => "resolved",
        }
    }

    /// Whether `next` is a forward move along active -> acknowledged -> resolved.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Active, Self::Acknowledged | Self::Resolved)
                | (Self::Acknowledged, Self::Resolved)
        )
    }
}

impl Display for AlertStatus {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for AlertStatus {
    type Err = UnknownLabel;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "acknowledged" => Ok(Self::Acknowledged),
            "resolved" => Ok(Self::Resolved),
            _ => Err(UnknownLabel {
                kind: "alert status",
                value: value.to_string(),
            }),
        }
    }
}

impl<'de> Deserialize<'de> for AlertStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

/// Server-produced timestamp, either an ISO string or epoch milliseconds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(pub Value);

impl Timestamp {
    /// Wrap an ISO-8601 string.
    #[must_use]
    pub fn iso(value: impl Into<String>) -> Self {
        Self(Value::String(value.into()))
    }

    /// `true` when the server omitted the field.
    #[must_use]
    pub fn is_missing(&self) -> bool {
        self.0.is_null()
    }
}

impl Display for Timestamp {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Value::Null => formatter.write_str("-"),
            Value::String(text) => formatter.write_str(text),
            other => write!(formatter, "{other}"),
        }
    }
}

/// Response from `GET /health`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HealthStatus {
    /// `UP` when the backend is serving.
    #[serde(default)]
    pub status: String,
    /// Optional banner message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Server clock at response time.
    #[serde(default)]
    pub timestamp: Timestamp,
}

/// Aggregate counters shown on the dashboard summary cards.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct DashboardStats {
    /// Number of scored entities.
    pub total_entities: u64,
    /// Entities in the HIGH or CRITICAL band.
    pub high_risk_entities: u64,
    /// Entities in the MEDIUM band.
    pub medium_risk_entities: u64,
    /// Entities in the LOW band.
    pub low_risk_entities: u64,
    /// Mean combined risk score.
    pub average_risk_score: f64,
    /// Entities with an active session.
    pub active_users: u64,
    /// Backend self-reported status label.
    pub backend_status: Option<String>,
    /// Model pipeline status label.
    pub ml_model_status: Option<String>,
    /// Threats detected in the reporting window.
    pub threats_detected: u64,
    /// False positive rate (percent).
    pub false_positive_rate: f64,
    /// Model accuracy (percent).
    pub accuracy_rate: f64,
}

/// A scored subject: user, service account, or device.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    /// Stable identifier (`USER001`, ...).
    pub entity_id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Subject kind (`USER`, `SERVICE`, `DEVICE`).
    #[serde(default, rename = "type")]
    pub kind: String,
    /// Owning department.
    #[serde(default)]
    pub department: String,
    /// Role or job title.
    #[serde(default)]
    pub role: String,
    /// Externally computed score.
    #[serde(default)]
    pub risk_score: f64,
    /// Externally assigned band; not checked against `risk_score`.
    pub risk_level: RiskLevel,
    /// Last recorded access.
    #[serde(default)]
    pub last_access_time: Timestamp,
    /// Whether the subject currently has a session.
    #[serde(default)]
    pub is_active: bool,
    /// Isolation forest component score, when the backend includes it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub isolation_forest_score: Option<f64>,
    /// Random forest component score, when the backend includes it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub random_forest_score: Option<f64>,
    /// Model confidence in `[0, 1]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

impl Entity {
    /// Fold a fresh assessment into the locally held row.
    pub fn apply_assessment(&mut self, result: &AssessmentResult) {
        self.risk_score = result.combined_risk_score;
        self.risk_level = result.risk_level;
        self.isolation_forest_score = Some(result.isolation_forest_score);
        self.random_forest_score = Some(result.random_forest_score);
        self.confidence = Some(result.confidence);
    }
}

/// Response from `POST /assess/{entityId}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentResult {
    /// Assessed entity.
    pub entity_id: String,
    /// Isolation forest component score.
    #[serde(default)]
    pub isolation_forest_score: f64,
    /// Random forest component score.
    #[serde(default)]
    pub random_forest_score: f64,
    /// Combined score produced by the backend.
    #[serde(default)]
    pub combined_risk_score: f64,
    /// Band for the combined score.
    pub risk_level: RiskLevel,
    /// Model confidence in `[0, 1]`.
    #[serde(default)]
    pub confidence: f64,
    /// When the assessment ran.
    #[serde(default, alias = "timestamp")]
    pub assessment_date: Timestamp,
    /// Ordered remediation steps.
    #[serde(default)]
    pub recommendations: Vec<String>,
}

/// One row of `GET /risk-analysis/scores`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RiskScoreRecord {
    /// Scored entity.
    pub entity_id: String,
    /// Isolation forest component score.
    #[serde(default)]
    pub isolation_forest_score: f64,
    /// Random forest component score.
    #[serde(default)]
    pub random_forest_score: f64,
    /// Combined score.
    #[serde(default)]
    pub combined_risk_score: f64,
    /// Band for the combined score.
    pub risk_level: RiskLevel,
    /// When the score was produced.
    #[serde(default)]
    pub timestamp: Timestamp,
}

/// Envelope for `GET /risk-analysis/scores`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct RiskScoresResponse {
    /// Per-entity scores.
    pub risk_scores: Vec<RiskScoreRecord>,
    /// Server-side mean of the combined scores.
    pub average_score: f64,
    /// Count in the HIGH/CRITICAL bands.
    pub high_risk_count: u64,
    /// Count in the MEDIUM band.
    pub medium_risk_count: u64,
    /// Count in the LOW band.
    pub low_risk_count: u64,
}

/// Response from `GET /risk-analysis/model-accuracy`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ModelAccuracy {
    /// Isolation forest accuracy (percent).
    pub isolation_forest_accuracy: f64,
    /// Random forest accuracy (percent).
    pub random_forest_accuracy: f64,
    /// Ensemble accuracy (percent).
    pub combined_accuracy: f64,
    /// False positive rate (percent).
    pub false_positive_rate: f64,
    /// True positive rate (percent).
    pub true_positive_rate: f64,
    /// When the models were last evaluated.
    pub last_updated: Timestamp,
}

/// Behavioural pattern surfaced by `GET /risk-analysis/patterns`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct RiskPattern {
    /// Pattern label (`AFTER_HOURS_ACCESS`, ...).
    pub pattern_type: String,
    /// Occurrences in the window.
    pub detection_count: u64,
    /// Detection confidence (percent).
    pub confidence: f64,
    /// Severity label as sent by the server.
    pub severity: String,
    /// Most recent occurrence.
    pub last_detected: Timestamp,
}

/// Envelope for `GET /risk-analysis/patterns`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct PatternsResponse {
    /// Detected patterns.
    pub patterns: Vec<RiskPattern>,
    /// Number of patterns.
    pub total_patterns: u64,
}

/// Remediation recommendation from `GET /risk-analysis/recommendations`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Recommendation {
    /// Identifier (`REC001`, ...).
    pub id: String,
    /// Short title.
    pub title: String,
    /// Longer explanation.
    pub description: String,
    /// Priority label.
    pub priority: String,
    /// Category label (`FIREWALL`, `MONITORING`, ...).
    pub category: String,
    /// Expected impact (percent).
    pub expected_impact: f64,
    /// Whether the recommendation is already in place.
    pub is_implemented: bool,
}

/// Envelope for `GET /risk-analysis/recommendations`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct RecommendationsResponse {
    /// Recommendations in server order.
    pub recommendations: Vec<Recommendation>,
    /// Number of recommendations.
    pub total_recommendations: u64,
}

/// Security alert raised against an entity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    /// Alert identifier.
    pub id: String,
    /// Short title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Longer description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Server-generated message; some backends send this instead of a description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Alert category (`BRUTE_FORCE`, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alert_type: Option<String>,
    /// Severity, case-insensitive on the wire.
    pub severity: Severity,
    /// Explicit lifecycle status, when the backend tracks it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<AlertStatus>,
    /// Legacy acknowledgement flag used when `status` is absent.
    #[serde(default)]
    pub is_acknowledged: bool,
    /// Entity the alert concerns.
    #[serde(default)]
    pub entity_id: String,
    /// Human-readable entity name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_name: Option<String>,
    /// Risk score at the time of the alert.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk_score: Option<f64>,
    /// When the alert was raised.
    #[serde(default)]
    pub timestamp: Timestamp,
}

impl Alert {
    /// Effective lifecycle status, falling back to the acknowledgement flag.
    #[must_use]
    pub const fn status(&self) -> AlertStatus {
        match self.status {
            Some(status) => status,
            None if self.is_acknowledged => AlertStatus::Acknowledged,
            None => AlertStatus::Active,
        }
    }

    /// Best available one-line summary.
    #[must_use]
    pub fn summary(&self) -> &str {
        self.title
            .as_deref()
            .or(self.description.as_deref())
            .or(self.message.as_deref())
            .or(self.alert_type.as_deref())
            .unwrap_or("")
    }
}

/// Response from `POST /alerts/{id}/acknowledge` and `/resolve`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct AlertTransitionReceipt {
    /// Alert that moved.
    pub alert_id: String,
    /// New status label (`ACKNOWLEDGED`, `RESOLVED`).
    pub status: String,
    /// Confirmation text.
    pub message: Option<String>,
}

/// Detected threat.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Threat {
    /// Threat identifier.
    pub threat_id: String,
    /// Entity the threat concerns.
    #[serde(default)]
    pub entity_id: String,
    /// Classification label.
    #[serde(default)]
    pub threat_type: String,
    /// Severity, case-insensitive on the wire.
    pub severity: Severity,
    /// Detection confidence (percent).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    /// Source address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    /// Geolocated origin.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Detection time.
    #[serde(default)]
    pub timestamp: Timestamp,
    /// Narrative description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Risk score attributed to the threat.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk_score: Option<f64>,
    /// Status label (`ACTIVE`, `MITIGATED`).
    #[serde(default)]
    pub status: String,
    /// Suggested mitigation steps.
    #[serde(default)]
    pub mitigation_actions: Vec<String>,
}

/// Response from `GET /threats/detect`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ThreatDetection {
    /// Threats detected in this sweep.
    pub threats: Vec<Threat>,
    /// Number of threats.
    pub total_threats: u64,
    /// Number with HIGH severity.
    pub high_severity_count: u64,
    /// Detector status label.
    pub system_status: Option<String>,
}

/// Response from `GET /threats/analytics`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ThreatAnalytics {
    /// Count by threat type.
    pub threat_type_distribution: BTreeMap<String, u64>,
    /// Count by severity label.
    pub severity_distribution: BTreeMap<String, u64>,
    /// Threats raised today.
    pub total_threats_today: u64,
    /// Mean time to respond, as formatted by the server.
    pub average_response_time: Option<String>,
    /// False positive rate, as formatted by the server.
    pub false_positive_rate: Option<String>,
    /// Detection accuracy, as formatted by the server.
    pub detection_accuracy: Option<String>,
}

/// Response from `POST /threats/{id}/mitigate`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct MitigationReceipt {
    /// Mitigated threat.
    pub threat_id: String,
    /// New status label.
    pub status: String,
    /// Steps the backend took.
    pub actions_taken: Vec<String>,
    /// Confirmation text.
    pub message: Option<String>,
}

/// Response from `GET /real-time/stats`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct RealTimeStats {
    /// Users with a live session.
    pub active_users_count: u64,
    /// Assessments run today.
    pub risk_assessments_today: u64,
    /// Alerts raised today.
    pub alerts_generated: u64,
    /// Mean assessment latency in seconds.
    pub average_response_time: f64,
    /// Server clock.
    pub timestamp: Timestamp,
}

/// Live session record.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct UserSession {
    /// Session owner.
    pub entity_id: String,
    /// Session identifier.
    pub session_id: String,
    /// Client address.
    pub ip_address: String,
    /// Login time.
    pub login_time: Timestamp,
    /// Last observed activity.
    pub last_activity: Timestamp,
}

/// Response from `GET /users/active`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ActiveUsers {
    /// Number of live sessions.
    pub active_users_count: u64,
    /// Sample of live sessions.
    pub active_users: Vec<UserSession>,
    /// Server clock.
    pub timestamp: Timestamp,
}

/// Live risk snapshot for one entity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EntityRiskSnapshot {
    /// Scored entity.
    pub entity_id: String,
    /// Isolation forest component score.
    #[serde(default)]
    pub isolation_forest_score: f64,
    /// Random forest component score.
    #[serde(default)]
    pub random_forest_score: f64,
    /// Combined score.
    #[serde(default)]
    pub combined_risk_score: f64,
    /// Band for the combined score.
    pub risk_level: RiskLevel,
    /// Last observed activity.
    #[serde(default)]
    pub last_activity: Timestamp,
    /// Source address of the last activity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    /// Activities in the window.
    #[serde(default)]
    pub activity_count: u64,
    /// Failed attempts in the window.
    #[serde(default)]
    pub failed_attempts: u64,
    /// Suggested follow-ups.
    #[serde(default)]
    pub recommendations: Vec<String>,
}

/// Response from `GET /real-time/risk-data`; both maps are keyed by id.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct RiskDataResponse {
    /// Live scores keyed by entity id.
    pub entity_risk_data: BTreeMap<String, EntityRiskSnapshot>,
    /// Live sessions keyed by session id.
    pub active_sessions: BTreeMap<String, UserSession>,
    /// Server clock.
    pub timestamp: Timestamp,
}

/// Element of `GET /real-time/risk-events`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RiskEvent {
    /// Entity that triggered the event.
    pub entity_id: String,
    /// Score at event time.
    #[serde(default)]
    pub risk_score: f64,
    /// Band at event time.
    pub risk_level: RiskLevel,
    /// Event time.
    #[serde(default)]
    pub timestamp: Timestamp,
    /// Event category (`HIGH_RISK_DETECTED`, ...).
    #[serde(default)]
    pub event_type: String,
    /// Narrative description.
    #[serde(default)]
    pub description: String,
}

/// Response from `POST /assessment/run-full`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct FullAssessmentReceipt {
    /// Outcome label.
    pub status: String,
    /// Confirmation text.
    pub message: Option<String>,
    /// Entities assessed.
    pub entities_assessed: u64,
    /// Entities found in the high band.
    pub high_risk_found: u64,
    /// Entities found in the medium band.
    pub medium_risk_found: u64,
    /// Entities found in the low band.
    pub low_risk_found: u64,
    /// Processing time as formatted by the server.
    pub processing_time: Option<String>,
}

/// Response from `POST /models/update`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ModelUpdateReceipt {
    /// Outcome label.
    pub status: String,
    /// Confirmation text.
    pub message: Option<String>,
    /// Models retrained.
    pub models_updated: Vec<String>,
    /// Accuracy delta as formatted by the server.
    pub accuracy_improvement: Option<String>,
    /// False-positive delta as formatted by the server.
    pub false_positive_reduction: Option<String>,
    /// Processing time as formatted by the server.
    pub processing_time: Option<String>,
}

/// Request body for `POST /reports/generate-pdf`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ReportRequest {
    /// Report template.
    pub report_type: String,
    /// Include charts in the document.
    pub include_charts: bool,
    /// Include the recommendations section.
    pub include_recommendations: bool,
    /// Human-readable window (`Last 30 days`).
    pub timeframe: String,
}

impl Default for ReportRequest {
    fn default() -> Self {
        Self {
            report_type: "COMPREHENSIVE_RISK_ASSESSMENT".to_string(),
            include_charts: true,
            include_recommendations: true,
            timeframe: "Last 30 days".to_string(),
        }
    }
}

/// Response from `POST /reports/generate`, `/reports/generate-pdf`, and
/// `GET /reports/download/{id}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ReportReceipt {
    /// Outcome label.
    pub status: String,
    /// Confirmation text.
    pub message: Option<String>,
    /// Report identifier used for the binary download.
    pub report_id: String,
    /// Report template.
    pub report_type: Option<String>,
    /// Server-relative download link.
    pub download_url: Option<String>,
    /// Size as formatted by the server.
    pub file_size: Option<String>,
    /// Page count.
    pub pages: Option<u64>,
    /// Section titles.
    pub report_content: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn risk_level_parses_case_insensitively() {
        assert_eq!("high".parse::<RiskLevel>(), Ok(RiskLevel::High));
        assert_eq!(" Critical ".parse::<RiskLevel>(), Ok(RiskLevel::Critical));
        let err = "severe".parse::<RiskLevel>().expect_err("unknown label");
        assert_eq!(err.to_string(), "unknown risk level 'severe'");
    }

    #[test]
    fn alert_accepts_both_backend_shapes() {
        let backend: Alert = serde_json::from_value(json!({
            "id": "ALERT-1",
            "entityId": "USER001",
            "alertType": "BRUTE_FORCE",
            "severity": "CRITICAL",
            "message": "Security alert: brute force",
            "timestamp": "2024-05-01T10:00:00",
            "isAcknowledged": true,
            "ipAddress": "192.168.1.120"
        }))
        .expect("backend alert");
        assert_eq!(backend.severity, Severity::Critical);
        assert_eq!(backend.status(), AlertStatus::Acknowledged);
        assert_eq!(backend.summary(), "Security alert: brute force");

        let panel: Alert = serde_json::from_value(json!({
            "id": "1",
            "title": "Suspicious Login Attempt Detected",
            "severity": "critical",
            "status": "active",
            "entityId": "1",
            "riskScore": 45
        }))
        .expect("panel alert");
        assert_eq!(panel.status(), AlertStatus::Active);
        assert_eq!(panel.risk_score, Some(45.0));
    }

    #[test]
    fn alert_status_only_moves_forward() {
        assert!(AlertStatus::Active.can_transition_to(AlertStatus::Acknowledged));
        assert!(AlertStatus::Acknowledged.can_transition_to(AlertStatus::Resolved));
        assert!(!AlertStatus::Resolved.can_transition_to(AlertStatus::Active));
        assert!(!AlertStatus::Acknowledged.can_transition_to(AlertStatus::Acknowledged));
    }

    #[test]
    fn timestamps_render_strings_and_epoch_values() {
        let iso = Timestamp::iso("2024-05-01T10:00:00");
        assert_eq!(iso.to_string(), "2024-05-01T10:00:00");
        assert_eq!(Timestamp(json!(1_714_557_600_000_u64)).to_string(), "1714557600000");
        assert!(Timestamp::default().is_missing());
    }

    #[test]
    fn entity_folds_assessment_results() {
        let mut entity: Entity = serde_json::from_value(json!({
            "entityId": "USER007",
            "name": "Dana Smith",
            "department": "Finance",
            "riskScore": 12.0,
            "riskLevel": "LOW"
        }))
        .expect("entity");
        let result: AssessmentResult = serde_json::from_value(json!({
            "entityId": "USER007",
            "isolationForestScore": 41.0,
            "randomForestScore": 39.0,
            "combinedRiskScore": 40.2,
            "riskLevel": "CRITICAL",
            "confidence": 0.91,
            "recommendations": ["Immediately lock account and investigate"]
        }))
        .expect("assessment");

        entity.apply_assessment(&result);
        assert_eq!(entity.risk_level, RiskLevel::Critical);
        assert!((entity.risk_score - 40.2).abs() < f64::EPSILON);
        assert_eq!(entity.confidence, Some(0.91));
    }

    #[test]
    fn risk_data_keeps_keyed_maps() {
        let response: RiskDataResponse = serde_json::from_value(json!({
            "entityRiskData": {
                "USER001": {
                    "entityId": "USER001",
                    "combinedRiskScore": 30.2,
                    "riskLevel": "MEDIUM"
                }
            },
            "activeSessions": {},
            "riskEvents": [],
            "timestamp": 1_714_557_600_000_u64
        }))
        .expect("risk data");
        assert_eq!(response.entity_risk_data.len(), 1);
        assert!(response.active_sessions.is_empty());
    }
}
