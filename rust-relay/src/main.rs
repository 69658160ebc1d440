//! Clerk Relay - webhook receiver that triggers Novu notifications.
//!
//! This binary:
//! - Receives Svix-signed webhooks from Clerk
//! - Verifies the signature
//! - Maps each event to a Novu workflow and triggers it

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::{net::TcpListener, signal};
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use clerk_relay::{router, AppState, Config, NovuClient, SvixVerifier};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize structured JSON logging
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().json().flatten_event(true))
        .init();

    info!("relay_starting");

    // Load configuration, failing fast on missing secrets
    let config = Config::from_env().context("Failed to load configuration")?;
    info!(
        port = config.port,
        novu_api_url = %config.novu_api_url,
        after_sign_in_url = %config.after_sign_in_url,
        subscriber_email = %config.subscriber_email,
        timestamp_tolerance_secs = config.timestamp_tolerance_secs,
        "config_loaded"
    );

    let verifier = SvixVerifier::new(&config.clerk_webhook_secret, config.timestamp_tolerance_secs)
        .context("Invalid CLERK_WEBHOOK_SECRET")?;

    let novu = NovuClient::new(
        &config.novu_api_url,
        config.novu_secret_key.clone(),
        Duration::from_millis(config.request_timeout_ms),
    )?;
    info!(trigger_url = %novu.trigger_url(), "novu_client_created");

    let port = config.port;
    let state = AppState::new(config, verifier, Arc::new(novu));
    let app = router(state);

    // Bind to address
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    info!(address = %addr, "relay_listening");

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("relay_shutdown_complete");

    Ok(())
}

/// Create a future that completes when a shutdown signal is received.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "ctrl_c_handler_failed");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "sigterm_handler_failed");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received SIGINT"),
        _ = terminate => info!("Received SIGTERM"),
    }

    info!("relay_shutting_down");
}
