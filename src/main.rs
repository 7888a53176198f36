//! SearchBar-RS: a single-page search redirector
//!
//! This is the main entry point for the application.

use anyhow::Result;
use clap::Parser;
use searchbar_rs::{
    config,
    web::{create_router, AppState},
};
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Single-page search redirector
#[derive(Debug, Parser)]
#[command(name = "searchbar-rs", version, about)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Server port (overrides settings)
    #[arg(short, long)]
    port: Option<u16>,

    /// Bind address (overrides settings)
    #[arg(long, value_name = "ADDR")]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let mut settings = config::load_settings(cli.config.as_deref())?;
    if let Some(port) = cli.port {
        settings.server.port = port;
    }
    if let Some(bind) = cli.bind {
        settings.server.bind_address = bind;
    }

    // Initialize logging
    let default_level = if settings.general.debug { "debug" } else { "info" };
    FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .init();

    info!("Starting SearchBar-RS v{}", searchbar_rs::VERSION);
    info!("Loaded configuration for instance: {}", settings.general.instance_name);

    let addr = SocketAddr::new(
        settings.server.bind_address.parse()?,
        settings.server.port,
    );

    // Create application state
    let state = AppState::new(settings)?;
    info!(
        "Loaded {} search engines (preference storage: {})",
        state.catalog.len(),
        if state.store.is_available() { "enabled" } else { "disabled" }
    );

    let app = create_router(state);

    info!("Starting server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
