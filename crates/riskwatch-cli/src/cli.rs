//! Argument parsing and command dispatch.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use riskwatch_gateway::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
use riskwatch_telemetry::{DEFAULT_LOG_LEVEL, LogFormat, LoggingConfig, init_logging};
use tracing::debug;
use url::Url;

use crate::client::{AppContext, CliError, CliResult, parse_url};
use crate::commands::actions::{
    handle_acknowledge, handle_assess, handle_detect, handle_mitigate, handle_resolve,
    handle_run_assessment, handle_update_models,
};
use crate::commands::health::handle_health;
use crate::commands::report::handle_report;
use crate::commands::views::{handle_show, handle_watch};

/// Parses CLI arguments, initialises logging, and executes the requested
/// command. Returns the process exit code.
pub async fn run() -> i32 {
    let cli = Cli::parse();

    if let Err(err) = init_cli_logging(&cli) {
        eprintln!("error: {}", err.display_message());
        return err.exit_code();
    }

    match dispatch(cli).await {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("error: {}", err.display_message());
            err.exit_code()
        }
    }
}

fn init_cli_logging(cli: &Cli) -> CliResult<()> {
    let format = LogFormat::resolve(cli.log_format.as_deref())
        .map_err(|err| CliError::validation(format!("--log-format: {err}")))?;
    init_logging(&LoggingConfig {
        level: &cli.log_level,
        format,
        build_sha: option_env!("RISKWATCH_BUILD_SHA").unwrap_or("dev"),
    })
    .map_err(CliError::failure)
}

async fn dispatch(cli: Cli) -> CliResult<()> {
    let ctx = AppContext::from_cli(&cli)?;
    debug!(
        base_url = %ctx.gateway.base_url(),
        trace_id = ctx.gateway.trace_id(),
        "gateway ready"
    );

    match cli.command {
        Command::Health => handle_health(&ctx).await,
        Command::Show(args) => handle_show(&ctx, args).await,
        Command::Watch(args) => handle_watch(&ctx, args).await,
        Command::Entities(EntitiesCommand::Assess(args)) => handle_assess(&ctx, args).await,
        Command::Alerts(alerts) => match alerts {
            AlertsCommand::Ack(args) => handle_acknowledge(&ctx, args).await,
            AlertsCommand::Resolve(args) => handle_resolve(&ctx, args).await,
        },
        Command::Threats(threats) => match threats {
            ThreatsCommand::Mitigate(args) => handle_mitigate(&ctx, args).await,
            ThreatsCommand::Detect => handle_detect(&ctx).await,
        },
        Command::Actions(actions) => match actions {
            ActionsCommand::RunAssessment => handle_run_assessment(&ctx).await,
            ActionsCommand::UpdateModels => handle_update_models(&ctx).await,
        },
        Command::Report(args) => handle_report(&ctx, args).await,
    }
}

#[derive(Parser)]
#[command(name = "riskwatch", about = "Terminal client for the risk-scoring dashboard")]
pub(crate) struct Cli {
    #[arg(
        long,
        global = true,
        env = "RISKWATCH_API_URL",
        value_parser = parse_url,
        default_value = DEFAULT_BASE_URL
    )]
    pub(crate) api_url: Url,
    #[arg(
        long,
        global = true,
        env = "RISKWATCH_HTTP_TIMEOUT_SECS",
        default_value_t = DEFAULT_TIMEOUT_SECS
    )]
    pub(crate) timeout: u64,
    #[arg(
        long = "output",
        alias = "format",
        global = true,
        value_enum,
        default_value_t = OutputFormat::Table,
        help = "Select output format for commands that render structured data"
    )]
    pub(crate) output: OutputFormat,
    #[arg(
        long,
        global = true,
        env = "RISKWATCH_LOG_LEVEL",
        default_value = DEFAULT_LOG_LEVEL
    )]
    pub(crate) log_level: String,
    #[arg(long, global = true, env = "RISKWATCH_LOG_FORMAT")]
    pub(crate) log_format: Option<String>,
    #[command(subcommand)]
    pub(crate) command: Command,
}

#[derive(Subcommand)]
pub(crate) enum Command {
    /// Report whether the backend is reachable.
    Health,
    /// Fetch one page once and render it.
    Show(ShowArgs),
    /// Poll one page and re-render on every change until interrupted.
    Watch(WatchArgs),
    /// Entity operations.
    #[command(subcommand)]
    Entities(EntitiesCommand),
    /// Alert lifecycle operations.
    #[command(subcommand)]
    Alerts(AlertsCommand),
    /// Threat operations.
    #[command(subcommand)]
    Threats(ThreatsCommand),
    /// Backend-wide quick actions.
    #[command(subcommand)]
    Actions(ActionsCommand),
    /// Generate a PDF report and download it.
    Report(ReportArgs),
}

#[derive(Subcommand)]
pub(crate) enum EntitiesCommand {
    /// Run an on-demand assessment for one entity.
    Assess(IdArgs),
}

#[derive(Subcommand)]
pub(crate) enum AlertsCommand {
    /// Acknowledge an alert.
    Ack(IdArgs),
    /// Resolve an alert.
    Resolve(IdArgs),
}

#[derive(Subcommand)]
pub(crate) enum ThreatsCommand {
    /// Apply mitigation to a threat.
    Mitigate(IdArgs),
    /// Trigger a detection sweep.
    Detect,
}

#[derive(Subcommand)]
pub(crate) enum ActionsCommand {
    /// Reassess every entity.
    RunAssessment,
    /// Retrain the scoring models.
    UpdateModels,
}

#[derive(Args, Debug, Clone)]
pub(crate) struct IdArgs {
    pub(crate) id: String,
    /// Render the affected page afterwards with the change applied locally.
    #[arg(long)]
    pub(crate) show: bool,
}

/// Filters and paging shared by `show` and `watch`.
#[derive(Args, Debug, Clone, Default)]
pub(crate) struct ViewArgs {
    /// Page to render; unknown names fall back to the dashboard.
    #[arg(value_name = "PAGE")]
    pub(crate) target: String,
    #[arg(long, default_value = "")]
    pub(crate) search: String,
    #[arg(long, help = "Risk level filter (low, medium, high, critical, all)")]
    pub(crate) level: Option<String>,
    #[arg(long, help = "Severity filter (low, medium, high, critical, all)")]
    pub(crate) severity: Option<String>,
    #[arg(long, help = "Alert status filter (active, acknowledged, resolved, all)")]
    pub(crate) status: Option<String>,
    #[arg(long = "page", short = 'p', default_value_t = 1)]
    pub(crate) page_number: usize,
}

#[derive(Args, Debug, Clone)]
pub(crate) struct ShowArgs {
    #[command(flatten)]
    pub(crate) view: ViewArgs,
}

#[derive(Args, Debug, Clone)]
pub(crate) struct WatchArgs {
    #[command(flatten)]
    pub(crate) view: ViewArgs,
    #[arg(long, help = "Override the page's refresh interval in seconds")]
    pub(crate) interval: Option<u64>,
}

#[derive(Args, Debug, Clone)]
pub(crate) struct ReportArgs {
    #[arg(long = "type", default_value = "COMPREHENSIVE_RISK_ASSESSMENT")]
    pub(crate) report_type: String,
    #[arg(long, default_value = "Last 30 days")]
    pub(crate) timeframe: String,
    #[arg(long)]
    pub(crate) out: Option<PathBuf>,
    #[arg(long)]
    pub(crate) no_charts: bool,
    #[arg(long)]
    pub(crate) no_recommendations: bool,
}

#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub(crate) enum OutputFormat {
    Table,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn show_parses_filters_and_page() {
        let cli = Cli::try_parse_from([
            "riskwatch",
            "show",
            "entities",
            "--search",
            "admin",
            "--level",
            "high",
            "--page",
            "2",
        ])
        .expect("parse");
        let Command::Show(args) = cli.command else {
            panic!("expected show command");
        };
        assert_eq!(args.view.target, "entities");
        assert_eq!(args.view.search, "admin");
        assert_eq!(args.view.level.as_deref(), Some("high"));
        assert_eq!(args.view.page_number, 2);
        assert_eq!(cli.output, OutputFormat::Table);
    }

    #[test]
    fn global_flags_apply_after_subcommand() {
        let cli = Cli::try_parse_from([
            "riskwatch",
            "alerts",
            "ack",
            "ALERT-1",
            "--output",
            "json",
            "--api-url",
            "http://backend:9000/api",
        ])
        .expect("parse");
        assert_eq!(cli.output, OutputFormat::Json);
        assert_eq!(cli.api_url.as_str(), "http://backend:9000/api");
        assert!(matches!(cli.command, Command::Alerts(AlertsCommand::Ack(_))));
    }

    #[test]
    fn report_defaults_match_backend_expectations() {
        let cli = Cli::try_parse_from(["riskwatch", "report"]).expect("parse");
        let Command::Report(args) = cli.command else {
            panic!("expected report command");
        };
        assert_eq!(args.report_type, "COMPREHENSIVE_RISK_ASSESSMENT");
        assert_eq!(args.timeframe, "Last 30 days");
        assert!(args.out.is_none());
    }

    #[test]
    fn invalid_api_url_is_rejected() {
        assert!(Cli::try_parse_from(["riskwatch", "--api-url", "::nope", "health"]).is_err());
    }
}
