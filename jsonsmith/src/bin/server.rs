//! jsonsmith proxy server binary
//!
//! Usage:
//!   jsonsmith-server [config.toml]
//!
//! The API key is read from the config file or from AI_GATEWAY_API_KEY /
//! LOVABLE_API_KEY. Without one the server still starts, and every proxied
//! request fails with a 500 explaining that the key is missing.

use anyhow::{Context, Result};
use jsonsmith::api::{create_router, ApiState};
use jsonsmith::{GatewayProvider, JsonsmithConfig, API_KEY_ENV_VARS};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    let config_path = PathBuf::from(
        std::env::args()
            .nth(1)
            .unwrap_or_else(|| "config.toml".to_string()),
    );
    let config = JsonsmithConfig::load(&config_path)
        .with_context(|| format!("Failed to load config file: {}", config_path.display()))?;

    let level: Level = config
        .log_level
        .parse()
        .with_context(|| format!("Invalid log_level: {}", config.log_level))?;
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting jsonsmith server v{}", env!("CARGO_PKG_VERSION"));
    info!(
        config_path = %config_path.display(),
        base_url = config.gateway.base_url,
        model = config.gateway.model,
        "Loaded configuration"
    );

    let provider = GatewayProvider::from_config(&config.gateway)
        .context("Failed to create AI gateway client")?;
    let api_key_configured = provider.has_api_key();
    if !api_key_configured {
        warn!(
            "No AI gateway API key configured (set gateway.api_key or one of {})",
            API_KEY_ENV_VARS.join(", ")
        );
    }

    let state = Arc::new(ApiState {
        provider: Arc::new(provider),
        enhance_temperature: config.gateway.enhance_temperature,
        api_key_configured,
    });

    let app = create_router(state);

    let addr: SocketAddr = config
        .bind_addr
        .parse()
        .with_context(|| format!("Invalid bind_addr: {}", config.bind_addr))?;
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
