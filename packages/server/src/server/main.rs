// Main entry point for the dialog analyzer API

use std::sync::Arc;

use anyhow::{Context, Result};
use analyzer_core::{kernel::ServerDeps, server::build_app, Config};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,analyzer_core=debug,tower_http=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_line_number(true),
        )
        .init();

    tracing::info!("Starting VT Group dialog analyzer");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;

    tracing::info!("Environment variables:");
    for name in &[
        "OPENAI_API_KEY",
        "OPENAI_BASE_URL",
        "OPENAI_MODEL",
        "OPENAI_TIMEOUT_SECS",
        "ANALYZER_MODE",
        "GOOGLE_SHEET_ID",
        "GOOGLE_SHEET_GID",
        "PORT",
    ] {
        mask_env(name);
    }
    tracing::info!(
        mode = ?config.mode,
        model = %config.openai_model,
        price_ttl_secs = config.price_cache_ttl.as_secs(),
        "Configuration loaded"
    );

    let deps = ServerDeps::from_config(&config).context("Failed to build dependencies")?;
    if deps.prices.is_none() {
        tracing::info!("No price sheet configured, sales route disabled");
    }

    // Build application
    let app = build_app(Arc::new(deps), config.mode);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Starting server on {}", addr);
    tracing::info!("Health check: http://localhost:{}/health", config.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Log an env var with all but its first four characters masked.
fn mask_env(name: &str) {
    match std::env::var(name) {
        Ok(val) if val.is_empty() => tracing::info!("  {}: (empty)", name),
        Ok(val) => {
            let total = val.chars().count();
            let prefix: String = val.chars().take(4).collect();
            tracing::info!(
                "  {}: {}{}  ({} chars)",
                name,
                prefix,
                "*".repeat(total.saturating_sub(4)),
                total
            );
        }
        Err(_) => tracing::warn!("  {}: NOT SET", name),
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
