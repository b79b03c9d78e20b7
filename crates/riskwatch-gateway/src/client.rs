//! Thin typed wrapper over the backend REST API.
//!
//! Every call is a single request with no retries. Errors surface to the
//! caller untouched; the polling layer decides whether to degrade.

use std::time::Duration;

use futures_util::StreamExt;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Client, Method, Response};
use riskwatch_api_models::{
    ActiveUsers, Alert, AlertTransitionReceipt, AssessmentResult, DashboardStats, Entity,
    FullAssessmentReceipt, HealthStatus, MitigationReceipt, ModelAccuracy, ModelUpdateReceipt,
    PatternsResponse, RealTimeStats, RecommendationsResponse, ReportReceipt, ReportRequest,
    RiskDataResponse, RiskEvent, RiskScoresResponse, Threat, ThreatAnalytics, ThreatDetection,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::debug;
use url::Url;
use uuid::Uuid;

use crate::endpoints::{self, Endpoint};
use crate::error::{GatewayError, GatewayResult};

/// Default backend location.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";
/// Default transport timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
/// Trace header attached to every request.
pub const HEADER_REQUEST_ID: &str = "x-request-id";

const APPLICATION_JSON: &str = "application/json";
const APPLICATION_PDF: &str = "application/pdf";

/// Connection settings for [`GatewayClient`].
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Base URL including any path prefix (e.g. `/api`).
    pub base_url: Url,
    /// Per-request transport timeout.
    pub timeout: Duration,
}

impl GatewayConfig {
    /// Settings for `base_url` with the default timeout.
    #[must_use]
    pub const fn new(base_url: Url) -> Self {
        Self {
            base_url,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Override the transport timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Stateless backend client. Cloning shares the underlying connection pool.
#[derive(Debug, Clone)]
pub struct GatewayClient {
    http: Client,
    base_url: Url,
    trace_id: String,
}

impl GatewayClient {
    /// Build a client with a fresh trace identifier.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::ClientBuild`] if the TLS backend cannot initialise.
    pub fn new(config: &GatewayConfig) -> GatewayResult<Self> {
        let trace_id = Uuid::new_v4().to_string();
        let mut default_headers = HeaderMap::new();
        if let Ok(value) = HeaderValue::from_str(&trace_id) {
            default_headers.insert(HEADER_REQUEST_ID, value);
        }

        let http = Client::builder()
            .timeout(config.timeout)
            .default_headers(default_headers)
            .build()
            .map_err(|source| GatewayError::ClientBuild { source })?;

        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            trace_id,
        })
    }

    /// Wrap an existing `reqwest` client; used by tests and embedders.
    #[must_use]
    pub fn with_http_client(http: Client, base_url: Url) -> Self {
        Self {
            http,
            base_url,
            trace_id: Uuid::new_v4().to_string(),
        }
    }

    /// Base URL every endpoint resolves under.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Trace identifier sent as `x-request-id`.
    #[must_use]
    pub fn trace_id(&self) -> &str {
        &self.trace_id
    }

    /// Issue an arbitrary JSON call and return the decoded body.
    ///
    /// An empty success body decodes to `Value::Null`.
    ///
    /// # Errors
    ///
    /// Returns the transport, status, or parse failure for the request.
    pub async fn call(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&Value>,
    ) -> GatewayResult<Value> {
        let endpoint = Endpoint::new(method, endpoint);
        let label = endpoint.to_string();
        let bytes = self.send(&endpoint, body, APPLICATION_JSON).await?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }
        serde_json::from_slice(&bytes).map_err(|source| GatewayError::parse(label, source))
    }

    /// Liveness probe. Any failure reads as "disconnected".
    pub async fn health_check(&self) -> bool {
        match self.health().await {
            Ok(_) => true,
            Err(err) => {
                debug!(error = %err.detail(), "backend health check failed");
                false
            }
        }
    }

    /// `GET /health`.
    ///
    /// # Errors
    ///
    /// Returns the transport, status, or parse failure for the request.
    pub async fn health(&self) -> GatewayResult<HealthStatus> {
        self.get_json(endpoints::HEALTH).await
    }

    /// `GET /dashboard/stats`.
    ///
    /// # Errors
    ///
    /// Returns the transport, status, or parse failure for the request.
    pub async fn dashboard_stats(&self) -> GatewayResult<DashboardStats> {
        self.get_json(endpoints::DASHBOARD_STATS).await
    }

    /// `GET /entities`.
    ///
    /// # Errors
    ///
    /// Returns the transport, status, or parse failure for the request.
    pub async fn entities(&self) -> GatewayResult<Vec<Entity>> {
        self.get_json(endpoints::ENTITIES).await
    }

    /// Look up one entity by scanning the full list; the backend has no
    /// single-entity route.
    ///
    /// # Errors
    ///
    /// Returns the transport, status, or parse failure for the list request.
    pub async fn entity(&self, entity_id: &str) -> GatewayResult<Option<Entity>> {
        let entities = self.entities().await?;
        Ok(entities
            .into_iter()
            .find(|entity| entity.entity_id == entity_id))
    }

    /// `POST /assess/{entityId}`.
    ///
    /// # Errors
    ///
    /// Returns the transport, status, or parse failure for the request.
    pub async fn assess_entity(&self, entity_id: &str) -> GatewayResult<AssessmentResult> {
        let endpoint = Endpoint::with_id(Method::POST, "/assess", entity_id, "");
        self.request_json(&endpoint, None::<&()>).await
    }

    /// `GET /users/active`.
    ///
    /// # Errors
    ///
    /// Returns the transport, status, or parse failure for the request.
    pub async fn active_users(&self) -> GatewayResult<ActiveUsers> {
        self.get_json(endpoints::USERS_ACTIVE).await
    }

    /// `GET /real-time/stats`.
    ///
    /// # Errors
    ///
    /// Returns the transport, status, or parse failure for the request.
    pub async fn real_time_stats(&self) -> GatewayResult<RealTimeStats> {
        self.get_json(endpoints::REAL_TIME_STATS).await
    }

    /// `GET /real-time/risk-data`.
    ///
    /// # Errors
    ///
    /// Returns the transport, status, or parse failure for the request.
    pub async fn real_time_risk_data(&self) -> GatewayResult<RiskDataResponse> {
        self.get_json(endpoints::REAL_TIME_RISK_DATA).await
    }

    /// `GET /real-time/risk-events`.
    ///
    /// # Errors
    ///
    /// Returns the transport, status, or parse failure for the request.
    pub async fn risk_events(&self) -> GatewayResult<Vec<RiskEvent>> {
        self.get_json(endpoints::REAL_TIME_RISK_EVENTS).await
    }

    /// `POST /assessment/run-full`.
    ///
    /// # Errors
    ///
    /// Returns the transport, status, or parse failure for the request.
    pub async fn run_full_assessment(&self) -> GatewayResult<FullAssessmentReceipt> {
        self.post_json(endpoints::ASSESSMENT_RUN_FULL).await
    }

    /// `POST /models/update`.
    ///
    /// # Errors
    ///
    /// Returns the transport, status, or parse failure for the request.
    pub async fn update_models(&self) -> GatewayResult<ModelUpdateReceipt> {
        self.post_json(endpoints::MODELS_UPDATE).await
    }

    /// `POST /reports/generate`.
    ///
    /// # Errors
    ///
    /// Returns the transport, status, or parse failure for the request.
    pub async fn generate_report(&self) -> GatewayResult<ReportReceipt> {
        self.post_json(endpoints::REPORTS_GENERATE).await
    }

    /// `POST /reports/generate-pdf`.
    ///
    /// # Errors
    ///
    /// Returns the transport, status, or parse failure for the request.
    pub async fn generate_pdf_report(&self, request: &ReportRequest) -> GatewayResult<ReportReceipt> {
        let endpoint = Endpoint::post(endpoints::REPORTS_GENERATE_PDF);
        self.request_json(&endpoint, Some(request)).await
    }

    /// `GET /reports/download/{reportId}`.
    ///
    /// # Errors
    ///
    /// Returns the transport, status, or parse failure for the request.
    pub async fn report_status(&self, report_id: &str) -> GatewayResult<ReportReceipt> {
        let endpoint = Endpoint::with_id(Method::GET, "/reports/download", report_id, "");
        self.request_json(&endpoint, None::<&()>).await
    }

    /// Stream `GET /reports/pdf/{reportId}` into `writer`, returning the byte count.
    ///
    /// # Errors
    ///
    /// Returns the transport or status failure for the request, or
    /// [`GatewayError::Write`] when the destination rejects a chunk.
    pub async fn download_pdf<W>(&self, report_id: &str, writer: &mut W) -> GatewayResult<u64>
    where
        W: AsyncWrite + Unpin + Send,
    {
        let endpoint = Endpoint::with_id(Method::GET, "/reports/pdf", report_id, "");
        let label = endpoint.to_string();
        let response = self.dispatch(&endpoint, None::<&()>, APPLICATION_PDF).await?;

        let mut stream = response.bytes_stream();
        let mut written = 0_u64;
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|source| GatewayError::transport(label.clone(), source))?;
            writer
                .write_all(&chunk)
                .await
                .map_err(|source| GatewayError::Write {
                    endpoint: label.clone(),
                    source,
                })?;
            written += u64::try_from(chunk.len()).unwrap_or(u64::MAX);
        }
        writer.flush().await.map_err(|source| GatewayError::Write {
            endpoint: label.clone(),
            source,
        })?;
        debug!(endpoint = %label, bytes = written, "report downloaded");
        Ok(written)
    }

    /// `GET /risk-analysis/scores`.
    ///
    /// # Errors
    ///
    /// Returns the transport, status, or parse failure for the request.
    pub async fn risk_scores(&self) -> GatewayResult<RiskScoresResponse> {
        self.get_json(endpoints::RISK_SCORES).await
    }

    /// `GET /risk-analysis/model-accuracy`.
    ///
    /// # Errors
    ///
    /// Returns the transport, status, or parse failure for the request.
    pub async fn model_accuracy(&self) -> GatewayResult<ModelAccuracy> {
        self.get_json(endpoints::MODEL_ACCURACY).await
    }

    /// `GET /risk-analysis/patterns`.
    ///
    /// # Errors
    ///
    /// Returns the transport, status, or parse failure for the request.
    pub async fn patterns(&self) -> GatewayResult<PatternsResponse> {
        self.get_json(endpoints::PATTERNS).await
    }

    /// `GET /risk-analysis/recommendations`.
    ///
    /// # Errors
    ///
    /// Returns the transport, status, or parse failure for the request.
    pub async fn recommendations(&self) -> GatewayResult<RecommendationsResponse> {
        self.get_json(endpoints::RECOMMENDATIONS).await
    }

    /// `GET /alerts`.
    ///
    /// # Errors
    ///
    /// Returns the transport, status, or parse failure for the request.
    pub async fn alerts(&self) -> GatewayResult<Vec<Alert>> {
        self.get_json(endpoints::ALERTS).await
    }

    /// `POST /alerts/{id}/acknowledge`.
    ///
    /// # Errors
    ///
    /// Returns the transport, status, or parse failure for the request.
    pub async fn acknowledge_alert(&self, alert_id: &str) -> GatewayResult<AlertTransitionReceipt> {
        let endpoint = Endpoint::with_id(Method::POST, "/alerts", alert_id, "/acknowledge");
        self.request_json(&endpoint, None::<&()>).await
    }

    /// `POST /alerts/{id}/resolve`.
    ///
    /// # Errors
    ///
    /// Returns the transport, status, or parse failure for the request.
    pub async fn resolve_alert(&self, alert_id: &str) -> GatewayResult<AlertTransitionReceipt> {
        let endpoint = Endpoint::with_id(Method::POST, "/alerts", alert_id, "/resolve");
        self.request_json(&endpoint, None::<&()>).await
    }

    /// `GET /threats/active`.
    ///
    /// # Errors
    ///
    /// Returns the transport, status, or parse failure for the request.
    pub async fn active_threats(&self) -> GatewayResult<Vec<Threat>> {
        self.get_json(endpoints::THREATS_ACTIVE).await
    }

    /// `GET /threats/detect`.
    ///
    /// # Errors
    ///
    /// Returns the transport, status, or parse failure for the request.
    pub async fn detect_threats(&self) -> GatewayResult<ThreatDetection> {
        self.get_json(endpoints::THREATS_DETECT).await
    }

    /// `GET /threats/analytics`.
    ///
    /// # Errors
    ///
    /// Returns the transport, status, or parse failure for the request.
    pub async fn threat_analytics(&self) -> GatewayResult<ThreatAnalytics> {
        self.get_json(endpoints::THREATS_ANALYTICS).await
    }

    /// `POST /threats/{id}/mitigate`.
    ///
    /// # Errors
    ///
    /// Returns the transport, status, or parse failure for the request.
    pub async fn mitigate_threat(&self, threat_id: &str) -> GatewayResult<MitigationReceipt> {
        let endpoint = Endpoint::with_id(Method::POST, "/threats", threat_id, "/mitigate");
        self.request_json(&endpoint, None::<&()>).await
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> GatewayResult<T> {
        self.request_json(&Endpoint::get(path), None::<&()>).await
    }

    async fn post_json<T: DeserializeOwned>(&self, path: &str) -> GatewayResult<T> {
        self.request_json(&Endpoint::post(path), None::<&()>).await
    }

    async fn request_json<T, B>(&self, endpoint: &Endpoint, body: Option<&B>) -> GatewayResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let bytes = self.send(endpoint, body, APPLICATION_JSON).await?;
        serde_json::from_slice(&bytes)
            .map_err(|source| GatewayError::parse(endpoint.to_string(), source))
    }

    async fn send<B>(
        &self,
        endpoint: &Endpoint,
        body: Option<&B>,
        accept: &'static str,
    ) -> GatewayResult<Vec<u8>>
    where
        B: Serialize + ?Sized,
    {
        let response = self.dispatch(endpoint, body, accept).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|source| GatewayError::transport(endpoint.to_string(), source))?;
        Ok(bytes.to_vec())
    }

    async fn dispatch<B>(
        &self,
        endpoint: &Endpoint,
        body: Option<&B>,
        accept: &'static str,
    ) -> GatewayResult<Response>
    where
        B: Serialize + ?Sized,
    {
        let label = endpoint.to_string();
        let url = endpoint
            .resolve(&self.base_url)
            .map_err(|source| GatewayError::invalid_endpoint(label.clone(), source))?;

        debug!(method = %endpoint.method(), endpoint = %label, "sending backend request");
        let builder = self
            .http
            .request(endpoint.method().clone(), url)
            .header(ACCEPT, accept)
            .header(CONTENT_TYPE, APPLICATION_JSON);
        let builder = match body {
            Some(body) => builder.json(body),
            None => builder,
        };

        let response = builder
            .send()
            .await
            .map_err(|source| GatewayError::transport(label.clone(), source))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(GatewayError::Http {
            endpoint: label,
            status: status.as_u16(),
            body: body.trim().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use riskwatch_api_models::{AlertStatus, RiskLevel};
    use riskwatch_test_support::unreachable_base_url;
    use serde_json::json;

    fn client_for(server: &MockServer, prefix: &str) -> GatewayClient {
        let base = format!("{}{prefix}", server.base_url());
        GatewayClient::with_http_client(Client::new(), base.parse().expect("valid URL"))
    }

    #[tokio::test]
    async fn dashboard_stats_resolves_under_api_prefix() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/api/dashboard/stats")
                .header("accept", "application/json");
            then.status(200).json_body(json!({
                "totalEntities": 45,
                "highRiskEntities": 25,
                "averageRiskScore": 31.4,
                "backendStatus": "CONNECTED"
            }));
        });

        let stats = client_for(&server, "/api")
            .dashboard_stats()
            .await
            .expect("stats");
        mock.assert();
        assert_eq!(stats.total_entities, 45);
        assert_eq!(stats.high_risk_entities, 25);
        assert_eq!(stats.backend_status.as_deref(), Some("CONNECTED"));
    }

    #[tokio::test]
    async fn non_success_status_maps_to_http_error() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/api/alerts");
            then.status(500).body("boom\n");
        });

        let err = client_for(&server, "/api")
            .alerts()
            .await
            .expect_err("500 must fail");
        match err {
            GatewayError::Http {
                endpoint,
                status,
                body,
            } => {
                assert_eq!(endpoint, "/alerts");
                assert_eq!(status, 500);
                assert_eq!(body, "boom");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn malformed_body_maps_to_parse_error() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/entities");
            then.status(200).body("not json");
        });

        let err = client_for(&server, "")
            .entities()
            .await
            .expect_err("invalid body");
        assert!(matches!(err, GatewayError::Parse { .. }));
    }

    #[tokio::test]
    async fn health_check_is_false_for_unreachable_host() {
        let client = GatewayClient::new(
            &GatewayConfig::new(unreachable_base_url()).with_timeout(Duration::from_secs(2)),
        )
        .expect("client");
        assert!(!client.health_check().await);
    }

    #[tokio::test]
    async fn health_check_is_true_when_backend_answers() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/api/health");
            then.status(200)
                .json_body(json!({"status": "UP", "timestamp": 1_714_557_600_000_u64}));
        });
        assert!(client_for(&server, "/api").health_check().await);
    }

    #[tokio::test]
    async fn entity_is_found_in_the_list() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/entities");
            then.status(200).json_body(json!([
                {"entityId": "USER001", "name": "Ana", "riskLevel": "LOW"},
                {"entityId": "USER002", "name": "Ben", "riskLevel": "HIGH"}
            ]));
        });

        let client = client_for(&server, "");
        let found = client.entity("USER002").await.expect("lookup");
        assert_eq!(found.map(|entity| entity.risk_level), Some(RiskLevel::High));
        assert!(client.entity("USER999").await.expect("lookup").is_none());
    }

    #[tokio::test]
    async fn alert_actions_post_to_id_paths() {
        let server = MockServer::start_async().await;
        let ack = server.mock(|when, then| {
            when.method(POST)
                .path("/api/alerts/ALERT-1/acknowledge")
                .header("content-type", "application/json");
            then.status(200).json_body(json!({
                "alertId": "ALERT-1",
                "status": "ACKNOWLEDGED",
                "message": "Alert acknowledged successfully"
            }));
        });
        let resolve = server.mock(|when, then| {
            when.method(POST).path("/api/alerts/ALERT-1/resolve");
            then.status(200)
                .json_body(json!({"alertId": "ALERT-1", "status": "RESOLVED"}));
        });

        let client = client_for(&server, "/api");
        let receipt = client.acknowledge_alert("ALERT-1").await.expect("ack");
        assert_eq!(receipt.status, "ACKNOWLEDGED");
        let receipt = client.resolve_alert("ALERT-1").await.expect("resolve");
        assert_eq!(receipt.status.parse::<AlertStatus>().ok(), Some(AlertStatus::Resolved));
        ack.assert();
        resolve.assert();
    }

    #[tokio::test]
    async fn generate_pdf_report_sends_request_body() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST).path("/reports/generate-pdf").json_body(json!({
                "reportType": "COMPREHENSIVE_RISK_ASSESSMENT",
                "includeCharts": true,
                "includeRecommendations": true,
                "timeframe": "Last 30 days"
            }));
            then.status(200).json_body(json!({
                "status": "SUCCESS",
                "reportId": "RPT-1",
                "pages": 15,
                "reportContent": ["Executive Summary"]
            }));
        });

        let receipt = client_for(&server, "")
            .generate_pdf_report(&ReportRequest::default())
            .await
            .expect("report");
        mock.assert();
        assert_eq!(receipt.report_id, "RPT-1");
        assert_eq!(receipt.pages, Some(15));
    }

    #[tokio::test]
    async fn download_pdf_streams_bytes_with_pdf_accept_header() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/api/reports/pdf/RPT-1")
                .header("accept", "application/pdf");
            then.status(200)
                .header("content-type", "application/pdf")
                .body("%PDF-1.4 fake");
        });

        let mut sink = Vec::new();
        let written = client_for(&server, "/api")
            .download_pdf("RPT-1", &mut sink)
            .await
            .expect("download");
        mock.assert();
        assert_eq!(written, 13);
        assert_eq!(sink, b"%PDF-1.4 fake");
    }

    #[tokio::test]
    async fn call_returns_raw_json_and_null_for_empty_bodies() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/api/threats/detect");
            then.status(200).json_body(json!({"totalThreats": 2}));
        });
        server.mock(|when, then| {
            when.method(POST).path("/api/models/update");
            then.status(200).body("");
        });

        let client = client_for(&server, "/api");
        let value = client
            .call(Method::GET, "threats/detect", None)
            .await
            .expect("call");
        assert_eq!(value["totalThreats"], 2);
        let empty = client
            .call(Method::POST, "/models/update", Some(&json!({})))
            .await
            .expect("call");
        assert!(empty.is_null());
    }

    #[tokio::test]
    async fn requests_carry_the_trace_header() {
        let server = MockServer::start_async().await;
        let base: Url = server.base_url().parse().expect("valid URL");
        let client = GatewayClient::new(&GatewayConfig::new(base)).expect("client");
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/health")
                .header(HEADER_REQUEST_ID, client.trace_id());
            then.status(200).json_body(json!({"status": "UP"}));
        });

        client.health().await.expect("health");
        mock.assert();
    }
}
