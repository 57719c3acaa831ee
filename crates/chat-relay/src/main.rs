use tracing::error;
use tracing_subscriber::EnvFilter;

use chat_relay::config::RelayConfig;
use chat_relay::server;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = match RelayConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Invalid configuration");
            std::process::exit(1);
        }
    };

    if let Err(e) = server::serve(config).await {
        error!(error = %e, "Relay stopped");
        std::process::exit(1);
    }
}
