use benefits_server::{ServerConfig, run_server, telemetry::init_telemetry};
use clap::Parser;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = ServerConfig::parse();
    init_telemetry(&config.log_level, config.log_json);

    info!(version = env!("CARGO_PKG_VERSION"), "benefits-server starting");
    run_server(config).await
}
