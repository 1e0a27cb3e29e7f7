use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use guildgate_server::config::BridgeConfig;
use guildgate_server::discord::client::DiscordClient;
use guildgate_server::web::app_state::AppState;
use guildgate_server::web::router::build_router;

#[derive(Parser)]
#[command(name = "guildgate-server", about = "REST query bridge for Discord guilds")]
struct Cli {
    /// Path to the TOML config file.
    #[arg(long, default_value = "guildgate.toml")]
    config: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = BridgeConfig::load(&cli.config);

    if config.discord.token.is_empty() {
        bail!(
            "No token found! Set the TOKEN environment variable or [discord].token in {}",
            cli.config
        );
    }

    // Open the process-wide Discord session; a bad token aborts here.
    let client = DiscordClient::login(&config.discord.token, &config.discord.api_base).await?;

    let app_state = Arc::new(AppState {
        fetcher: Arc::new(client),
    });
    let app = build_router(app_state);

    let addr = config.listen_address();
    info!("Guildgate server starting on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind web listener on {}", addr))?;

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
