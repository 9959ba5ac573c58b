//! Plugin system for update handlers.
//!
//! Add new plugins by:
//! 1. Creating a new file in this directory
//! 2. Adding `pub mod your_plugin;` below
//! 3. Registering the handler in `bot::dispatcher::build_dispatcher()`

pub mod replies;
pub mod start;

use teloxide::types::Update;
use teloxide::utils::command::BotCommands;
use tracing::debug;

use crate::utils::{MessageExt, UpdateExt};

/// All bot commands.
#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "Available commands:")]
pub enum Command {
    #[command(description = "Get your chat ID for UniShark")]
    Start(String),
}

/// Whether the update carries a `/start` command addressed to this bot.
///
/// `/start`, `/START`, `/start payload` and `/start@<bot_username>` all
/// match; `/start@other_bot` does not.
pub fn is_start_command(update: &Update, bot_username: &str) -> bool {
    let Some(msg) = update.effective_message() else {
        return false;
    };
    let Some(text) = msg.text() else {
        return false;
    };
    if !msg.starts_with_command() {
        return false;
    }

    match Command::parse(&lowercase_command(text), bot_username) {
        Ok(Command::Start(payload)) => {
            if !payload.is_empty() {
                debug!("/start with payload {:?}", payload);
            }
            true
        }
        Err(_) => false,
    }
}

/// Whether the update carries plain text, i.e. text not opening with a
/// bot command.
pub fn is_plain_text(update: &Update) -> bool {
    update
        .effective_message()
        .map(|msg| msg.text().is_some() && !msg.starts_with_command())
        .unwrap_or(false)
}

/// Lowercase the command word, leaving the payload untouched.
fn lowercase_command(text: &str) -> String {
    match text.split_once(' ') {
        Some((command, payload)) => format!("{} {}", command.to_lowercase(), payload),
        None => text.to_lowercase(),
    }
}
