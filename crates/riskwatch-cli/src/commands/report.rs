//! PDF report generation and download.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use anyhow::anyhow;
use riskwatch_api_models::ReportRequest;
use tokio::fs::File;
use tracing::{info, warn};

use crate::cli::ReportArgs;
use crate::client::{AppContext, CliError, CliResult, classify_gateway};
use crate::output::render_receipt;

pub(crate) async fn handle_report(ctx: &AppContext, args: ReportArgs) -> CliResult<()> {
    let request = report_request(&args)?;
    let receipt = ctx
        .gateway
        .generate_pdf_report(&request)
        .await
        .map_err(|err| classify_gateway(&err))?;
    let report_id = receipt.report_id.trim();
    if report_id.is_empty() {
        return Err(CliError::failure(anyhow!(
            "report generation returned no report id"
        )));
    }

    let path = args.out.unwrap_or_else(|| default_path(report_id));
    let partial = partial_path(&path);
    let mut file = File::create(&partial).await.map_err(|err| {
        CliError::failure(anyhow!("failed to create {}: {err}", partial.display()))
    })?;
    let downloaded = ctx.gateway.download_pdf(report_id, &mut file).await;
    drop(file);
    let written = match downloaded {
        Ok(written) => written,
        Err(err) => {
            discard(&partial).await;
            return Err(classify_gateway(&err));
        }
    };
    if let Err(err) = tokio::fs::rename(&partial, &path).await {
        discard(&partial).await;
        return Err(CliError::failure(anyhow!(
            "failed to move report into {}: {err}",
            path.display()
        )));
    }
    info!(report_id, bytes = written, path = %path.display(), "report saved");

    let mut lines = vec![
        ("report", report_id.to_string()),
        ("status", receipt.status.clone()),
        ("saved to", path.display().to_string()),
        ("bytes", written.to_string()),
    ];
    if let Some(pages) = receipt.pages {
        lines.push(("pages", pages.to_string()));
    }
    lines.extend(
        receipt
            .report_content
            .iter()
            .map(|section| ("section", section.clone())),
    );
    render_receipt(&receipt, &lines, ctx.output)
}

fn report_request(args: &ReportArgs) -> CliResult<ReportRequest> {
    let report_type = args.report_type.trim();
    if report_type.is_empty() {
        return Err(CliError::validation("report type must not be empty"));
    }
    Ok(ReportRequest {
        report_type: report_type.to_string(),
        include_charts: !args.no_charts,
        include_recommendations: !args.no_recommendations,
        timeframe: args.timeframe.trim().to_string(),
    })
}

fn default_path(report_id: &str) -> PathBuf {
    PathBuf::from(format!("risk-assessment-report-{report_id}.pdf"))
}

/// Sibling path the download streams into before it is renamed into place.
fn partial_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map_or_else(|| OsString::from("report.pdf"), ToOwned::to_owned);
    name.push(".part");
    path.with_file_name(name)
}

async fn discard(partial: &Path) {
    if let Err(err) = tokio::fs::remove_file(partial).await {
        warn!(path = %partial.display(), error = %err, "failed to remove partial report");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use reqwest::Client;
    use riskwatch_gateway::GatewayClient;
    use serde_json::json;

    use crate::cli::OutputFormat;

    fn context_with(server: &MockServer) -> AppContext {
        let base = format!("{}/api", server.base_url()).parse().expect("valid URL");
        AppContext {
            gateway: GatewayClient::with_http_client(Client::new(), base),
            output: OutputFormat::Table,
        }
    }

    fn args(out: Option<PathBuf>) -> ReportArgs {
        ReportArgs {
            report_type: "COMPREHENSIVE_RISK_ASSESSMENT".to_string(),
            timeframe: "Last 7 days".to_string(),
            out,
            no_charts: true,
            no_recommendations: false,
        }
    }

    #[test]
    fn request_mirrors_flags() {
        let request = report_request(&args(None)).expect("valid args");
        assert!(!request.include_charts);
        assert!(request.include_recommendations);
        assert_eq!(request.timeframe, "Last 7 days");
    }

    #[test]
    fn blank_report_type_is_rejected() {
        let mut blank = args(None);
        blank.report_type = "  ".to_string();
        let err = report_request(&blank).expect_err("blank type");
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn default_file_name_carries_report_id() {
        assert_eq!(
            default_path("RPT-42"),
            PathBuf::from("risk-assessment-report-RPT-42.pdf")
        );
    }

    #[tokio::test]
    async fn generates_then_downloads_pdf() {
        let server = MockServer::start_async().await;
        let generate = server.mock(|when, then| {
            when.method(POST).path("/api/reports/generate-pdf");
            then.status(200).json_body(json!({
                "status": "SUCCESS",
                "reportId": "RPT-77",
                "pages": 12,
                "reportContent": ["Executive Summary"]
            }));
        });
        let download = server.mock(|when, then| {
            when.method(GET).path("/api/reports/pdf/RPT-77");
            then.status(200)
                .header("content-type", "application/pdf")
                .body("%PDF-1.4 fake");
        });

        let path = std::env::temp_dir().join(format!(
            "riskwatch-report-{}-RPT-77.pdf",
            std::process::id()
        ));
        let ctx = context_with(&server);
        assert!(handle_report(&ctx, args(Some(path.clone()))).await.is_ok());
        generate.assert();
        download.assert();

        let saved = tokio::fs::read(&path).await.expect("report written");
        assert_eq!(saved, b"%PDF-1.4 fake");
        assert!(!partial_path(&path).exists());
        let _ = tokio::fs::remove_file(&path).await;
    }

    #[test]
    fn partial_download_sits_next_to_target() {
        let target = Path::new("/tmp/reports/out.pdf");
        assert_eq!(partial_path(target), PathBuf::from("/tmp/reports/out.pdf.part"));
    }

    #[tokio::test]
    async fn failed_download_leaves_no_file_behind() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST).path("/api/reports/generate-pdf");
            then.status(200)
                .json_body(json!({ "status": "SUCCESS", "reportId": "RPT-9" }));
        });
        let download = server.mock(|when, then| {
            when.method(GET).path("/api/reports/pdf/RPT-9");
            then.status(404).body("report expired");
        });

        let path = std::env::temp_dir().join(format!(
            "riskwatch-report-{}-RPT-9.pdf",
            std::process::id()
        ));
        let ctx = context_with(&server);
        let err = handle_report(&ctx, args(Some(path.clone())))
            .await
            .expect_err("missing report");
        assert_eq!(err.exit_code(), 3);
        download.assert();
        assert!(!path.exists(), "target must not be created");
        assert!(!partial_path(&path).exists(), "partial download must be removed");
    }

    #[tokio::test]
    async fn missing_report_id_is_operational_failure() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST).path("/api/reports/generate-pdf");
            then.status(200).json_body(json!({ "status": "QUEUED" }));
        });

        let ctx = context_with(&server);
        let err = handle_report(&ctx, args(None)).await.expect_err("no id");
        assert_eq!(err.exit_code(), 3);
    }
}
