use anyhow::Context;

use inquiry_relay::config::{NotificationConfig, NotificationSource, ServerConfig};
use inquiry_relay::relay::routes::INQUIRY_PATH;
use inquiry_relay::relay::{RelayState, relay_routes};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let server_config = ServerConfig::from_env()?;
    let addr = server_config.socket_addr();

    // Credentials are re-read per request; this is only for the banner.
    let notifications = NotificationConfig::from_env();

    eprintln!("📨 Inquiry Relay v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Intake: http://{addr}{INQUIRY_PATH}");
    eprintln!("   Health: http://{addr}/health");
    eprintln!(
        "   Telegram: {}",
        if notifications.is_configured() {
            "enabled"
        } else {
            "not configured (notifications skipped)"
        }
    );
    eprintln!("   Timezone: {}\n", notifications.timezone.name());

    let app = relay_routes(RelayState::new(NotificationSource::Env));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(%addr, "Inquiry relay started");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("Inquiry relay stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
