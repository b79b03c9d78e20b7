//! Output renderers and formatting helpers for CLI commands.

use anyhow::anyhow;
use riskwatch_api_models::{AnalyticsData, DashboardData, Entity, RiskAnalysisData};
use riskwatch_gateway::ViewSnapshot;
use riskwatch_views::bands::{band_for_score, marker};
use riskwatch_views::pages::{
    AlertBoard, AnalyticsBreakdown, EntitiesView, LiveRiskPane, ThreatBoard, footer,
};
use riskwatch_views::{Page, PageBounds};
use serde::Serialize;

use crate::cli::OutputFormat;
use crate::client::{CliError, CliResult};

/// Connection facts rendered above every page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SnapshotMeta {
    pub(crate) page: Page,
    pub(crate) connected: bool,
    pub(crate) using_fallback: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) last_error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) last_updated: Option<String>,
}

impl SnapshotMeta {
    pub(crate) fn from_snapshot<T>(page: Page, snapshot: &ViewSnapshot<T>) -> Self {
        Self {
            page,
            connected: snapshot.connected,
            using_fallback: snapshot.using_fallback,
            last_error: snapshot.last_error.clone(),
            last_updated: snapshot.last_updated.map(|at| at.to_rfc3339()),
        }
    }

    /// Disconnected banner, if one applies.
    pub(crate) fn banner(&self) -> Option<String> {
        if self.connected {
            return None;
        }
        let reason = self.last_error.as_deref().unwrap_or("backend unreachable");
        let suffix = if self.using_fallback {
            "; showing placeholder data"
        } else {
            "; showing last known data"
        };
        Some(format!("[disconnected] {reason}{suffix}"))
    }
}

#[derive(Serialize)]
struct Envelope<'a, T: Serialize> {
    #[serde(flatten)]
    meta: &'a SnapshotMeta,
    data: T,
}

pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> CliResult<()> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|err| CliError::failure(anyhow!("failed to format JSON: {err}")))?;
    println!("{text}");
    Ok(())
}

fn print_heading(meta: &SnapshotMeta) {
    println!("== {} ==", meta.page.title());
    if let Some(banner) = meta.banner() {
        println!("{banner}");
    }
    if let Some(at) = &meta.last_updated {
        println!("updated: {at}");
    }
}

pub(crate) fn render_health(connected: bool, format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(&serde_json::json!({ "connected": connected })),
        OutputFormat::Table => {
            println!("backend: {}", connection_label(connected));
            Ok(())
        }
    }
}

pub(crate) const fn connection_label(connected: bool) -> &'static str {
    if connected { "connected" } else { "disconnected" }
}

pub(crate) fn render_dashboard(
    meta: &SnapshotMeta,
    data: Option<&DashboardData>,
    live: Option<&LiveRiskPane>,
    format: OutputFormat,
) -> CliResult<()> {
    if format == OutputFormat::Json {
        return print_json(&Envelope {
            meta,
            data: serde_json::json!({ "dashboard": data, "liveRisk": live }),
        });
    }
    print_heading(meta);
    let Some(data) = data else {
        println!("no data yet");
        return Ok(());
    };
    let stats = &data.stats;
    println!("total entities:     {}", stats.total_entities);
    println!("high risk:          {}", stats.high_risk_entities);
    println!("average risk score: {:.1}", stats.average_risk_score);
    println!("threats detected:   {}", stats.threats_detected);
    println!("false positives:    {:.1}%", stats.false_positive_rate);
    println!("model accuracy:     {:.1}%", stats.accuracy_rate);
    if let Some(status) = &stats.backend_status {
        println!("backend status:     {status}");
    }
    println!(
        "active users: {}  assessments today: {}  alerts generated: {}",
        data.real_time.active_users_count,
        data.real_time.risk_assessments_today,
        data.real_time.alerts_generated
    );
    if let Some(live) = live {
        render_live_rows(live);
    }
    if !data.risk_events.is_empty() {
        println!("recent events:");
        for event in data.risk_events.iter().take(10) {
            println!(
                "  {:<24} {:<10} {:<9} {}",
                event.timestamp.to_string(),
                event.entity_id,
                event.risk_level.as_str(),
                event.description
            );
        }
    }
    Ok(())
}

fn render_live_rows(live: &LiveRiskPane) {
    println!(
        "live scores ({} entities, {} elevated, {} events):",
        live.rows.len(),
        live.elevated,
        live.event_count
    );
    println!("  {:<2} {:<12} {:>8} {:<9}", "", "ENTITY", "SCORE", "LEVEL");
    for row in live.rows.iter().take(10) {
        println!(
            "  {:<2} {:<12} {:>8.2} {:<9}",
            marker(band_for_score(row.combined_risk_score)),
            row.entity_id,
            row.combined_risk_score,
            row.risk_level.as_str()
        );
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EntitiesPayload<'a> {
    summary: riskwatch_views::aggregate::EntitySummary,
    bounds: PageBounds,
    items: Vec<&'a Entity>,
}

pub(crate) fn render_entities(
    meta: &SnapshotMeta,
    view: &EntitiesView,
    format: OutputFormat,
) -> CliResult<()> {
    let list = view.list();
    if format == OutputFormat::Json {
        return print_json(&Envelope {
            meta,
            data: EntitiesPayload {
                summary: view.summary(),
                bounds: list.bounds(),
                items: list.page_items(),
            },
        });
    }
    print_heading(meta);
    let summary = view.summary();
    println!(
        "entities: {}  high risk: {}  average score: {:.1}  matching: {}",
        summary.total, summary.high_risk, summary.average_score, summary.filtered
    );
    println!(
        "{:<2} {:<12} {:<24} {:<14} {:>7} {:<9} LAST ACCESS",
        "", "ID", "NAME", "DEPARTMENT", "SCORE", "LEVEL"
    );
    for entity in list.page_items() {
        println!(
            "{:<2} {:<12} {:<24} {:<14} {:>7.1} {:<9} {}",
            marker(band_for_score(entity.risk_score)),
            entity.entity_id,
            truncate(&entity.name, 24),
            truncate(&entity.department, 14),
            entity.risk_score,
            entity.risk_level.as_str(),
            entity.last_access_time
        );
    }
    println!("{}", footer(list));
    Ok(())
}

pub(crate) fn render_risk_analysis(
    meta: &SnapshotMeta,
    data: Option<&RiskAnalysisData>,
    format: OutputFormat,
) -> CliResult<()> {
    if format == OutputFormat::Json {
        return print_json(&Envelope { meta, data });
    }
    print_heading(meta);
    let Some(data) = data else {
        println!("no data yet");
        return Ok(());
    };
    let accuracy = &data.accuracy;
    println!(
        "accuracy: isolation {:.1}%  random forest {:.1}%  combined {:.1}%  fpr {:.1}%",
        accuracy.isolation_forest_accuracy,
        accuracy.random_forest_accuracy,
        accuracy.combined_accuracy,
        accuracy.false_positive_rate
    );
    println!(
        "scores: average {:.2}  high {}  medium {}  low {}",
        data.scores.average_score,
        data.scores.high_risk_count,
        data.scores.medium_risk_count,
        data.scores.low_risk_count
    );
    println!("{:<12} {:>10} {:>10} {:>10} LEVEL", "ENTITY", "ISOLATION", "FOREST", "COMBINED");
    for record in &data.scores.risk_scores {
        println!(
            "{:<12} {:>10.2} {:>10.2} {:>10.2} {}",
            record.entity_id,
            record.isolation_forest_score,
            record.random_forest_score,
            record.combined_risk_score,
            record.risk_level.as_str()
        );
    }
    println!("patterns ({}):", data.patterns.total_patterns);
    for pattern in &data.patterns.patterns {
        println!(
            "  {:<28} {:>5} hits  {:>5.1}%  {}",
            pattern.pattern_type, pattern.detection_count, pattern.confidence, pattern.severity
        );
    }
    println!("recommendations ({}):", data.recommendations.total_recommendations);
    for item in &data.recommendations.recommendations {
        let done = if item.is_implemented { "done" } else { "open" };
        println!("  [{done}] {} ({}, {})", item.title, item.priority, item.category);
    }
    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ThreatPayload<'a> {
    bounds: PageBounds,
    threats: Vec<&'a riskwatch_api_models::Threat>,
    analytics: &'a riskwatch_api_models::ThreatAnalytics,
}

pub(crate) fn render_threats(
    meta: &SnapshotMeta,
    board: &ThreatBoard,
    format: OutputFormat,
) -> CliResult<()> {
    let list = board.list();
    if format == OutputFormat::Json {
        return print_json(&Envelope {
            meta,
            data: ThreatPayload {
                bounds: list.bounds(),
                threats: list.page_items(),
                analytics: board.analytics(),
            },
        });
    }
    print_heading(meta);
    let analytics = board.analytics();
    println!(
        "threats today: {}  high severity (visible): {}  detection accuracy: {}",
        analytics.total_threats_today,
        board.high_severity_count(),
        analytics.detection_accuracy.as_deref().unwrap_or("-")
    );
    println!(
        "{:<16} {:<12} {:<26} {:<9} {:<16} STATUS",
        "ID", "ENTITY", "TYPE", "SEVERITY", "SOURCE IP"
    );
    for threat in list.page_items() {
        println!(
            "{:<16} {:<12} {:<26} {:<9} {:<16} {}",
            threat.threat_id,
            threat.entity_id,
            truncate(&threat.threat_type, 26),
            threat.severity.as_str(),
            threat.ip_address.as_deref().unwrap_or("-"),
            threat.status
        );
    }
    println!("{}", footer(list));
    Ok(())
}

pub(crate) fn render_analytics(
    meta: &SnapshotMeta,
    data: Option<&AnalyticsData>,
    format: OutputFormat,
) -> CliResult<()> {
    let breakdown = data.map(AnalyticsBreakdown::derive);
    if format == OutputFormat::Json {
        return print_json(&Envelope {
            meta,
            data: serde_json::json!({
                "breakdown": breakdown,
                "accuracy": data.map(|data| &data.accuracy),
                "threats": data.map(|data| &data.threats),
            }),
        });
    }
    print_heading(meta);
    let (Some(data), Some(breakdown)) = (data, breakdown) else {
        println!("no data yet");
        return Ok(());
    };
    println!("{:<16} {:>8} {:>7}", "DEPARTMENT", "AVG RISK", "COUNT");
    for department in &breakdown.departments {
        println!(
            "{:<16} {:>8.1} {:>7}",
            department.department, department.average_risk, department.count
        );
    }
    println!("risk level distribution:");
    for (level, share) in &breakdown.level_distribution {
        println!("  {:<9} {share:>3}%", level.as_str());
    }
    println!(
        "models: combined {:.1}%  true positives {:.1}%  false positives {:.1}%",
        data.accuracy.combined_accuracy,
        data.accuracy.true_positive_rate,
        data.accuracy.false_positive_rate
    );
    println!("threats today: {}", data.threats.total_threats_today);
    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AlertPayload<'a> {
    active: usize,
    bounds: PageBounds,
    alerts: Vec<&'a riskwatch_api_models::Alert>,
}

pub(crate) fn render_alerts(
    meta: &SnapshotMeta,
    board: &AlertBoard,
    format: OutputFormat,
) -> CliResult<()> {
    let list = board.list();
    if format == OutputFormat::Json {
        return print_json(&Envelope {
            meta,
            data: AlertPayload {
                active: board.active_count(),
                bounds: list.bounds(),
                alerts: list.page_items(),
            },
        });
    }
    print_heading(meta);
    println!("active alerts: {}", board.active_count());
    println!(
        "{:<12} {:<9} {:<13} {:<12} {:<24} SUMMARY",
        "ID", "SEVERITY", "STATUS", "ENTITY", "RAISED"
    );
    for alert in list.page_items() {
        println!(
            "{:<12} {:<9} {:<13} {:<12} {:<24} {}",
            alert.id,
            alert.severity.as_str(),
            alert.status().as_str(),
            alert.entity_id,
            alert.timestamp.to_string(),
            alert.summary()
        );
    }
    println!("{}", footer(list));
    Ok(())
}

/// Render a remote-action receipt as JSON or as `key: value` lines.
pub(crate) fn render_receipt<T: Serialize>(
    receipt: &T,
    lines: &[(&str, String)],
    format: OutputFormat,
) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(receipt),
        OutputFormat::Table => {
            for (key, value) in lines {
                println!("{key}: {value}");
            }
            Ok(())
        }
    }
}

pub(crate) fn truncate(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    let mut shortened: String = value.chars().take(width.saturating_sub(1)).collect();
    shortened.push('~');
    shortened
}
