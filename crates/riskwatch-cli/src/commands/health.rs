//! `health`: report backend reachability without failing.

use crate::client::{AppContext, CliResult};
use crate::output::render_health;

pub(crate) async fn handle_health(ctx: &AppContext) -> CliResult<()> {
    let connected = ctx.gateway.health_check().await;
    render_health(connected, ctx.output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use reqwest::Client;
    use riskwatch_gateway::GatewayClient;
    use riskwatch_test_support::unreachable_base_url;
    use serde_json::json;

    use crate::cli::OutputFormat;

    #[tokio::test]
    async fn health_succeeds_when_backend_answers() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET).path("/api/health");
            then.status(200).json_body(json!({ "status": "UP" }));
        });
        let base = format!("{}/api", server.base_url()).parse().expect("valid URL");
        let ctx = AppContext {
            gateway: GatewayClient::with_http_client(Client::new(), base),
            output: OutputFormat::Json,
        };

        assert!(handle_health(&ctx).await.is_ok());
        mock.assert();
    }

    #[tokio::test]
    async fn health_reports_disconnected_without_error() {
        let ctx = AppContext {
            gateway: GatewayClient::with_http_client(Client::new(), unreachable_base_url()),
            output: OutputFormat::Table,
        };
        assert!(handle_health(&ctx).await.is_ok());
    }
}
