//! UniShark Bot - Telegram webhook receiver
//!
//! Hands users their chat ID so UniShark can notify them about new
//! assignments, quizzes and deadlines.
//!
//! ## Architecture
//!
//! - `config` - Environment configuration
//! - `models` - Inbound update and outbound message types
//! - `bot` - Webhook endpoint, dispatcher and Telegram client
//! - `plugins` - Update handlers (extensible)
//! - `utils` - Utility functions

mod bot;
mod config;
mod models;
mod plugins;
mod utils;

use std::sync::Arc;

use teloxide::prelude::*;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use bot::{TelegramSender, WebhookState};
use config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file first (before anything else)
    dotenvy::dotenv().ok();

    // If RUST_LOG is not set, default to "info" level for our crate
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("unishark=info,teloxide=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .init();

    info!("Starting UniShark bot...");

    let config = Config::from_env().inspect_err(|e| error!("Fatal configuration error: {}", e))?;
    info!("Configuration loaded successfully");

    // One client for the whole process, reused by every request
    let sender = TelegramSender::new(&config.bot_token, config.request_timeout)?;
    info!("Bot client initialized");

    // Get bot username from config or fallback to get_me()
    let bot_username = match config.bot_username.clone() {
        Some(name) => name,
        None => {
            let me = sender.bot().get_me().await?;
            me.username().to_string()
        }
    };
    info!("Using bot username: @{}", bot_username);

    let dispatcher = bot::build_dispatcher(&config, bot_username);
    let state = WebhookState::new(&config.bot_token, dispatcher, Arc::new(sender.clone()));

    bot::run(&config, &sender, state).await
}
