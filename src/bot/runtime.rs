//! Bot runtime - HTTP server for webhook delivery.

use teloxide::prelude::*;
use tokio::net::TcpListener;
use tracing::{error, info};

use super::sender::TelegramSender;
use super::webhook::{WebhookState, router};
use crate::config::Config;

/// Register the webhook with Telegram (if configured) and serve until Ctrl+C.
pub async fn run(
    config: &Config,
    sender: &TelegramSender,
    state: WebhookState,
) -> anyhow::Result<()> {
    if let Some(endpoint) = config.webhook_endpoint() {
        let endpoint = endpoint?;
        sender.bot().set_webhook(endpoint).await?;
        info!("Webhook registered with Telegram");
    } else {
        info!("WEBHOOK_URL not set, assuming the webhook is registered externally");
    }

    let listener = TcpListener::bind(config.listen_addr).await?;
    info!("📡 Listening on: {}", config.listen_addr);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Received Ctrl+C, shutting down..."),
        Err(e) => {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    }
}
