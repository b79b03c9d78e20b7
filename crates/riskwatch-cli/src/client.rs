//! Shared gateway context, error types, and argument parsers for the CLI.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;
use std::time::Duration;

use anyhow::anyhow;
use riskwatch_gateway::{GatewayClient, GatewayConfig, GatewayError};
use riskwatch_views::Choice;
use url::Url;

use crate::cli::{Cli, OutputFormat};

/// CLI-level error type to distinguish validation from operational failures.
#[derive(Debug)]
pub(crate) enum CliError {
    Validation(String),
    Failure(anyhow::Error),
}

/// Convenience alias for functions returning a `CliError`.
pub(crate) type CliResult<T> = Result<T, CliError>;

impl CliError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub(crate) fn failure(error: impl Into<anyhow::Error>) -> Self {
        Self::Failure(error.into())
    }

    pub(crate) const fn exit_code(&self) -> i32 {
        match self {
            Self::Validation(_) => 2,
            Self::Failure(_) => 3,
        }
    }

    pub(crate) fn display_message(&self) -> String {
        match self {
            Self::Validation(message) => message.clone(),
            Self::Failure(error) => format!("{error:#}"),
        }
    }
}

impl Display for CliError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str("cli error")
    }
}

impl std::error::Error for CliError {}

/// Application context passed to command handlers.
#[derive(Clone)]
pub(crate) struct AppContext {
    pub(crate) gateway: GatewayClient,
    pub(crate) output: OutputFormat,
}

impl AppContext {
    /// Build the gateway client from global flags.
    pub(crate) fn from_cli(cli: &Cli) -> CliResult<Self> {
        let config = GatewayConfig::new(cli.api_url.clone())
            .with_timeout(Duration::from_secs(cli.timeout));
        let gateway = GatewayClient::new(&config).map_err(|err| {
            CliError::failure(anyhow!("failed to build HTTP client: {}", err.detail()))
        })?;
        Ok(Self {
            gateway,
            output: cli.output,
        })
    }
}

/// Parse the API URL provided to the CLI.
pub(crate) fn parse_url(input: &str) -> Result<Url, String> {
    input
        .parse::<Url>()
        .map_err(|err| format!("invalid URL '{input}': {err}"))
}

/// Parse an `all`-or-value filter flag.
pub(crate) fn parse_choice<T>(flag: &str, raw: Option<&str>) -> CliResult<Choice<T>>
where
    T: FromStr,
    T::Err: Display,
{
    raw.map_or(Ok(Choice::All), |value| {
        Choice::parse(value).map_err(|err| CliError::validation(format!("--{flag}: {err}")))
    })
}

/// Reject blank identifiers before they reach the backend.
pub(crate) fn require_id<'a>(kind: &str, raw: &'a str) -> CliResult<&'a str> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(CliError::validation(format!("{kind} must not be empty")));
    }
    Ok(trimmed)
}

/// Classify a gateway failure into a CLI error.
///
/// Rejections the backend attributes to the request itself count as validation
/// errors; everything else is operational.
pub(crate) fn classify_gateway(err: &GatewayError) -> CliError {
    match err.status() {
        Some(400 | 409 | 422) => CliError::validation(err.detail()),
        _ => CliError::failure(anyhow!(err.detail())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use riskwatch_api_models::{RiskLevel, Severity};

    #[test]
    fn parse_url_rejects_garbage() {
        assert!(parse_url("http://localhost:8080/api").is_ok());
        let err = parse_url("not a url").expect_err("invalid");
        assert!(err.contains("invalid URL 'not a url'"));
    }

    #[test]
    fn parse_choice_accepts_sentinel_and_rejects_unknown() {
        assert_eq!(
            parse_choice::<RiskLevel>("level", None).map_err(|err| err.display_message()).ok(),
            Some(Choice::All)
        );
        assert_eq!(
            parse_choice::<Severity>("severity", Some("HIGH"))
                .map_err(|err| err.display_message())
                .ok(),
            Some(Choice::Only(Severity::High))
        );
        let err = parse_choice::<RiskLevel>("level", Some("extreme")).expect_err("invalid");
        assert_eq!(err.exit_code(), 2);
        assert!(err.display_message().starts_with("--level:"));
    }

    #[test]
    fn require_id_trims_and_rejects_blank() {
        assert_eq!(require_id("alert id", " A-1 ").ok(), Some("A-1"));
        assert_eq!(require_id("alert id", "  ").map(|_| ()).map_err(|e| e.exit_code()), Err(2));
    }
}
