//! Binary entrypoint for the `riskwatch` command.

#[tokio::main]
async fn main() {
    let code = riskwatch_cli::run().await;
    std::process::exit(code);
}
