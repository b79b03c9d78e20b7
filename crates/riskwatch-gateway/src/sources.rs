//! One [`ViewSource`] per page, each combining the calls that page issues together.
//!
//! A failure in any of a page's calls fails the whole fetch; the polling layer then
//! degrades the page as a unit.

use std::time::Duration;

use async_trait::async_trait;
use riskwatch_api_models::{
    Alert, AnalyticsData, DashboardData, Entity, RealTimeRiskData, RealTimeSnapshot,
    RiskAnalysisData, ThreatBoardData,
};

use crate::client::GatewayClient;
use crate::error::GatewayResult;
use crate::fallback;
use crate::poll::ViewSource;

/// Refresh cadence per view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollIntervals {
    /// Live per-entity scores.
    pub risk_data: Duration,
    /// Live throughput counters.
    pub real_time_stats: Duration,
    /// Threat detection page.
    pub threats: Duration,
    /// Dashboard summary.
    pub dashboard: Duration,
    /// Entity list.
    pub entities: Duration,
    /// Risk analysis page.
    pub risk_analysis: Duration,
    /// Analytics page.
    pub analytics: Duration,
    /// Alerts page.
    pub alerts: Duration,
}

impl Default for PollIntervals {
    fn default() -> Self {
        Self {
            risk_data: Duration::from_secs(3),
            real_time_stats: Duration::from_secs(5),
            threats: Duration::from_secs(10),
            dashboard: Duration::from_secs(30),
            entities: Duration::from_secs(30),
            risk_analysis: Duration::from_secs(30),
            analytics: Duration::from_secs(30),
            alerts: Duration::from_secs(30),
        }
    }
}

impl PollIntervals {
    /// Same cadence for every view.
    #[must_use]
    pub const fn uniform(interval: Duration) -> Self {
        Self {
            risk_data: interval,
            real_time_stats: interval,
            threats: interval,
            dashboard: interval,
            entities: interval,
            risk_analysis: interval,
            analytics: interval,
            alerts: interval,
        }
    }
}

/// Dashboard summary plus the live panes it embeds.
#[derive(Debug, Clone)]
pub struct DashboardSource {
    client: GatewayClient,
}

impl DashboardSource {
    /// Source backed by `client`.
    #[must_use]
    pub const fn new(client: GatewayClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ViewSource for DashboardSource {
    type Output = DashboardData;

    fn name(&self) -> &'static str {
        "dashboard"
    }

    async fn fetch(&self) -> GatewayResult<DashboardData> {
        let (stats, health, real_time, active_users, risk_data, risk_events) = tokio::try_join!(
            self.client.dashboard_stats(),
            self.client.health(),
            self.client.real_time_stats(),
            self.client.active_users(),
            self.client.real_time_risk_data(),
            self.client.risk_events(),
        )?;
        Ok(DashboardData {
            stats,
            health,
            real_time,
            active_users,
            risk_data,
            risk_events,
        })
    }

    fn fallback(&self) -> Option<DashboardData> {
        Some(fallback::dashboard())
    }
}

/// Entity list. There is no placeholder; an outage shows an empty table.
#[derive(Debug, Clone)]
pub struct EntitiesSource {
    client: GatewayClient,
}

impl EntitiesSource {
    /// Source backed by `client`.
    #[must_use]
    pub const fn new(client: GatewayClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ViewSource for EntitiesSource {
    type Output = Vec<Entity>;

    fn name(&self) -> &'static str {
        "entities"
    }

    async fn fetch(&self) -> GatewayResult<Vec<Entity>> {
        self.client.entities().await
    }
}

/// Model scores, accuracy, patterns, and recommendations.
#[derive(Debug, Clone)]
pub struct RiskAnalysisSource {
    client: GatewayClient,
}

impl RiskAnalysisSource {
    /// Source backed by `client`.
    #[must_use]
    pub const fn new(client: GatewayClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ViewSource for RiskAnalysisSource {
    type Output = RiskAnalysisData;

    fn name(&self) -> &'static str {
        "risk-analysis"
    }

    async fn fetch(&self) -> GatewayResult<RiskAnalysisData> {
        let (scores, accuracy, patterns, recommendations) = tokio::try_join!(
            self.client.risk_scores(),
            self.client.model_accuracy(),
            self.client.patterns(),
            self.client.recommendations(),
        )?;
        Ok(RiskAnalysisData {
            scores,
            accuracy,
            patterns,
            recommendations,
        })
    }

    fn fallback(&self) -> Option<RiskAnalysisData> {
        Some(fallback::risk_analysis())
    }
}

/// Active threats and threat analytics.
#[derive(Debug, Clone)]
pub struct ThreatSource {
    client: GatewayClient,
}

impl ThreatSource {
    /// Source backed by `client`.
    #[must_use]
    pub const fn new(client: GatewayClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ViewSource for ThreatSource {
    type Output = ThreatBoardData;

    fn name(&self) -> &'static str {
        "threat-detection"
    }

    async fn fetch(&self) -> GatewayResult<ThreatBoardData> {
        let (threats, analytics) =
            tokio::try_join!(self.client.active_threats(), self.client.threat_analytics())?;
        Ok(ThreatBoardData { threats, analytics })
    }

    fn fallback(&self) -> Option<ThreatBoardData> {
        Some(fallback::threat_board())
    }
}

/// Entities, model accuracy, and threat analytics for the analytics page.
#[derive(Debug, Clone)]
pub struct AnalyticsSource {
    client: GatewayClient,
}

impl AnalyticsSource {
    /// Source backed by `client`.
    #[must_use]
    pub const fn new(client: GatewayClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ViewSource for AnalyticsSource {
    type Output = AnalyticsData;

    fn name(&self) -> &'static str {
        "analytics"
    }

    async fn fetch(&self) -> GatewayResult<AnalyticsData> {
        let (entities, accuracy, threats) = tokio::try_join!(
            self.client.entities(),
            self.client.model_accuracy(),
            self.client.threat_analytics(),
        )?;
        Ok(AnalyticsData {
            entities,
            accuracy,
            threats,
            departments: None,
            level_distribution: None,
        })
    }

    fn fallback(&self) -> Option<AnalyticsData> {
        Some(fallback::analytics())
    }
}

/// Security alerts.
#[derive(Debug, Clone)]
pub struct AlertsSource {
    client: GatewayClient,
}

impl AlertsSource {
    /// Source backed by `client`.
    #[must_use]
    pub const fn new(client: GatewayClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ViewSource for AlertsSource {
    type Output = Vec<Alert>;

    fn name(&self) -> &'static str {
        "alerts"
    }

    async fn fetch(&self) -> GatewayResult<Vec<Alert>> {
        self.client.alerts().await
    }

    fn fallback(&self) -> Option<Vec<Alert>> {
        Some(fallback::alerts())
    }
}

/// Live per-entity scores and recent risk events.
#[derive(Debug, Clone)]
pub struct RealTimeRiskSource {
    client: GatewayClient,
}

impl RealTimeRiskSource {
    /// Source backed by `client`.
    #[must_use]
    pub const fn new(client: GatewayClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ViewSource for RealTimeRiskSource {
    type Output = RealTimeRiskData;

    fn name(&self) -> &'static str {
        "real-time-risk"
    }

    async fn fetch(&self) -> GatewayResult<RealTimeRiskData> {
        let (risk_data, events) =
            tokio::try_join!(self.client.real_time_risk_data(), self.client.risk_events())?;
        Ok(RealTimeRiskData { risk_data, events })
    }
}

/// Live throughput counters and sessions.
#[derive(Debug, Clone)]
pub struct RealTimeStatsSource {
    client: GatewayClient,
}

impl RealTimeStatsSource {
    /// Source backed by `client`.
    #[must_use]
    pub const fn new(client: GatewayClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ViewSource for RealTimeStatsSource {
    type Output = RealTimeSnapshot;

    fn name(&self) -> &'static str {
        "real-time-stats"
    }

    async fn fetch(&self) -> GatewayResult<RealTimeSnapshot> {
        let (stats, active_users) =
            tokio::try_join!(self.client.real_time_stats(), self.client.active_users())?;
        Ok(RealTimeSnapshot {
            stats,
            active_users,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::poll::{ApplyOutcome, ViewStore, fetch_cycle};
    use httpmock::prelude::*;
    use reqwest::Client;
    use riskwatch_test_support::fixtures;
    use serde_json::json;

    fn client_for(server: &MockServer) -> GatewayClient {
        GatewayClient::with_http_client(
            Client::new(),
            format!("{}/api", server.base_url())
                .parse()
                .expect("valid URL"),
        )
    }

    #[test]
    fn default_intervals_follow_view_cadence() {
        let intervals = PollIntervals::default();
        assert_eq!(intervals.risk_data, Duration::from_secs(3));
        assert_eq!(intervals.real_time_stats, Duration::from_secs(5));
        assert_eq!(intervals.threats, Duration::from_secs(10));
        assert_eq!(intervals.alerts, Duration::from_secs(30));
        assert_eq!(
            PollIntervals::uniform(Duration::from_secs(1)).dashboard,
            Duration::from_secs(1)
        );
    }

    #[tokio::test]
    async fn entities_source_degrades_to_empty_on_outage() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/api/entities");
            then.status(503);
        });

        let source = EntitiesSource::new(client_for(&server));
        let store = ViewStore::new(source.name());
        assert_eq!(fetch_cycle(&source, &store).await, ApplyOutcome::Applied);
        let snapshot = store.snapshot();
        assert!(!snapshot.connected);
        assert!(snapshot.data.is_none());
    }

    #[tokio::test]
    async fn alerts_source_substitutes_placeholder_alerts() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/api/alerts");
            then.status(500);
        });

        let source = AlertsSource::new(client_for(&server));
        let store = ViewStore::new(source.name());
        fetch_cycle(&source, &store).await;
        let snapshot = store.snapshot();
        assert!(snapshot.using_fallback);
        assert_eq!(snapshot.data().map(Vec::len), Some(8));
    }

    #[tokio::test]
    async fn threat_source_fails_as_a_unit() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/api/threats/active");
            then.status(200).json_body(json!([]));
        });
        server.mock(|when, then| {
            when.method(GET).path("/api/threats/analytics");
            then.status(502);
        });

        let source = ThreatSource::new(client_for(&server));
        let err = source.fetch().await.expect_err("analytics outage");
        assert_eq!(err.status(), Some(502));
    }

    #[tokio::test]
    async fn analytics_source_leaves_breakdowns_to_the_client() {
        let server = MockServer::start_async().await;
        let entities = fixtures::entities_with_levels(10, 4);
        server.mock(|when, then| {
            when.method(GET).path("/api/entities");
            then.status(200).json_body(json!(entities));
        });
        server.mock(|when, then| {
            when.method(GET).path("/api/risk-analysis/model-accuracy");
            then.status(200).json_body(json!({"combinedAccuracy": 97.7}));
        });
        server.mock(|when, then| {
            when.method(GET).path("/api/threats/analytics");
            then.status(200).json_body(json!({"totalThreatsToday": 3}));
        });

        let data = AnalyticsSource::new(client_for(&server))
            .fetch()
            .await
            .expect("analytics");
        assert_eq!(data.entities.len(), 10);
        assert!(data.departments.is_none());
        assert_eq!(data.threats.total_threats_today, 3);
    }

    #[tokio::test]
    async fn real_time_risk_source_combines_data_and_events() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/api/real-time/risk-data");
            then.status(200).json_body(json!({
                "entityRiskData": {
                    "USER001": {"entityId": "USER001", "combinedRiskScore": 12.0, "riskLevel": "LOW"},
                    "USER002": {"entityId": "USER002", "combinedRiskScore": 41.0, "riskLevel": "CRITICAL"}
                },
                "activeSessions": {}
            }));
        });
        server.mock(|when, then| {
            when.method(GET).path("/api/real-time/risk-events");
            then.status(200).json_body(json!([{
                "entityId": "USER002",
                "riskScore": 41.0,
                "riskLevel": "CRITICAL",
                "eventType": "HIGH_RISK_DETECTED"
            }]));
        });

        let data = RealTimeRiskSource::new(client_for(&server))
            .fetch()
            .await
            .expect("risk data");
        assert_eq!(data.risk_data.entity_risk_data.len(), 2);
        assert_eq!(data.events.len(), 1);
    }
}
