//! Remote actions: assessments, alert transitions, threat handling, quick actions.

use riskwatch_api_models::{AlertStatus, AlertTransitionReceipt, ThreatBoardData};
use riskwatch_gateway::{AlertsSource, EntitiesSource, ThreatSource};
use riskwatch_views::pages::{AlertBoard, EntitiesView, ThreatBoard};
use riskwatch_views::{AlertFilter, EntityFilter, Page, ThreatFilter};
use tracing::info;

use crate::cli::IdArgs;
use crate::client::{AppContext, CliResult, classify_gateway, require_id};
use crate::commands::views::show_with_edit;
use crate::output::render_receipt;

pub(crate) async fn handle_assess(ctx: &AppContext, args: IdArgs) -> CliResult<()> {
    let entity_id = require_id("entity id", &args.id)?;
    let result = ctx
        .gateway
        .assess_entity(entity_id)
        .await
        .map_err(|err| classify_gateway(&err))?;
    info!(entity_id, level = result.risk_level.as_str(), "assessment complete");

    let mut lines = vec![
        ("entity", result.entity_id.clone()),
        ("level", result.risk_level.to_string()),
        ("combined score", format!("{:.2}", result.combined_risk_score)),
        ("isolation forest", format!("{:.2}", result.isolation_forest_score)),
        ("random forest", format!("{:.2}", result.random_forest_score)),
        ("confidence", format!("{:.2}", result.confidence)),
        ("assessed", result.assessment_date.to_string()),
    ];
    lines.extend(
        result
            .recommendations
            .iter()
            .map(|step| ("recommendation", step.clone())),
    );
    render_receipt(&result, &lines, ctx.output)?;

    if args.show {
        show_with_edit(
            ctx,
            Page::Entities,
            EntitiesSource::new(ctx.gateway.clone()),
            EntitiesView::new(Vec::new(), EntityFilter::default()),
            |view| view.apply_assessment(&result),
        )
        .await?;
    }
    Ok(())
}

pub(crate) async fn handle_acknowledge(ctx: &AppContext, args: IdArgs) -> CliResult<()> {
    let alert_id = require_id("alert id", &args.id)?;
    let receipt = ctx
        .gateway
        .acknowledge_alert(alert_id)
        .await
        .map_err(|err| classify_gateway(&err))?;
    render_transition(ctx, alert_id, AlertStatus::Acknowledged, &receipt)?;

    if args.show {
        show_alert_board(ctx, |board| board.acknowledge_local(alert_id)).await?;
    }
    Ok(())
}

pub(crate) async fn handle_resolve(ctx: &AppContext, args: IdArgs) -> CliResult<()> {
    let alert_id = require_id("alert id", &args.id)?;
    let receipt = ctx
        .gateway
        .resolve_alert(alert_id)
        .await
        .map_err(|err| classify_gateway(&err))?;
    render_transition(ctx, alert_id, AlertStatus::Resolved, &receipt)?;

    if args.show {
        show_alert_board(ctx, |board| board.resolve_local(alert_id)).await?;
    }
    Ok(())
}

async fn show_alert_board(
    ctx: &AppContext,
    edit: impl FnOnce(&mut AlertBoard) -> bool,
) -> CliResult<()> {
    show_with_edit(
        ctx,
        Page::Alerts,
        AlertsSource::new(ctx.gateway.clone()),
        AlertBoard::new(Vec::new(), AlertFilter::default()),
        edit,
    )
    .await
}

fn render_transition(
    ctx: &AppContext,
    alert_id: &str,
    next: AlertStatus,
    receipt: &AlertTransitionReceipt,
) -> CliResult<()> {
    info!(alert_id, status = next.as_str(), "alert transitioned");
    let status = if receipt.status.is_empty() {
        next.to_string()
    } else {
        receipt.status.clone()
    };
    let mut lines = vec![("alert", alert_id.to_string()), ("status", status)];
    if let Some(message) = &receipt.message {
        lines.push(("message", message.clone()));
    }
    render_receipt(receipt, &lines, ctx.output)
}

pub(crate) async fn handle_mitigate(ctx: &AppContext, args: IdArgs) -> CliResult<()> {
    let threat_id = require_id("threat id", &args.id)?;
    let receipt = ctx
        .gateway
        .mitigate_threat(threat_id)
        .await
        .map_err(|err| classify_gateway(&err))?;
    info!(threat_id, "mitigation applied");

    let mut lines = vec![("threat", threat_id.to_string()), ("status", receipt.status.clone())];
    lines.extend(
        receipt
            .actions_taken
            .iter()
            .map(|action| ("action", action.clone())),
    );
    if let Some(message) = &receipt.message {
        lines.push(("message", message.clone()));
    }
    render_receipt(&receipt, &lines, ctx.output)?;

    if args.show {
        show_with_edit(
            ctx,
            Page::ThreatDetection,
            ThreatSource::new(ctx.gateway.clone()),
            ThreatBoard::new(ThreatBoardData::default(), ThreatFilter::default()),
            |board| board.mark_mitigated(threat_id),
        )
        .await?;
    }
    Ok(())
}

pub(crate) async fn handle_detect(ctx: &AppContext) -> CliResult<()> {
    let detection = ctx
        .gateway
        .detect_threats()
        .await
        .map_err(|err| classify_gateway(&err))?;

    let mut lines = vec![
        ("threats", detection.total_threats.to_string()),
        ("high severity", detection.high_severity_count.to_string()),
    ];
    if let Some(status) = &detection.system_status {
        lines.push(("system", status.clone()));
    }
    lines.extend(detection.threats.iter().map(|threat| {
        (
            "threat",
            format!(
                "{} {} {} ({})",
                threat.threat_id,
                threat.threat_type,
                threat.entity_id,
                threat.severity
            ),
        )
    }));
    render_receipt(&detection, &lines, ctx.output)
}

pub(crate) async fn handle_run_assessment(ctx: &AppContext) -> CliResult<()> {
    let receipt = ctx
        .gateway
        .run_full_assessment()
        .await
        .map_err(|err| classify_gateway(&err))?;
    info!(entities = receipt.entities_assessed, "full assessment finished");

    let mut lines = vec![
        ("status", receipt.status.clone()),
        ("entities assessed", receipt.entities_assessed.to_string()),
        ("high", receipt.high_risk_found.to_string()),
        ("medium", receipt.medium_risk_found.to_string()),
        ("low", receipt.low_risk_found.to_string()),
    ];
    if let Some(elapsed) = &receipt.processing_time {
        lines.push(("processing time", elapsed.clone()));
    }
    render_receipt(&receipt, &lines, ctx.output)
}

pub(crate) async fn handle_update_models(ctx: &AppContext) -> CliResult<()> {
    let receipt = ctx
        .gateway
        .update_models()
        .await
        .map_err(|err| classify_gateway(&err))?;
    info!(models = receipt.models_updated.len(), "model update finished");

    let mut lines = vec![
        ("status", receipt.status.clone()),
        ("models", receipt.models_updated.join(", ")),
    ];
    if let Some(delta) = &receipt.accuracy_improvement {
        lines.push(("accuracy improvement", delta.clone()));
    }
    if let Some(delta) = &receipt.false_positive_reduction {
        lines.push(("false positive reduction", delta.clone()));
    }
    render_receipt(&receipt, &lines, ctx.output)
}
