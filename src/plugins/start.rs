//! /start command plugin.
//!
//! Sends the user their chat ID so they can paste it into their UniShark
//! settings page.

use async_trait::async_trait;
use teloxide::types::{ChatId, Update};
use tracing::info;
use url::Url;

use crate::bot::dispatcher::Handler;
use crate::bot::sender::MessageSender;
use crate::models::OutboundMessage;
use crate::utils::{MessageExt, UpdateExt, html_escape};

/// Handles the /start command.
pub struct StartHandler {
    site_url: Url,
}

impl StartHandler {
    pub fn new(site_url: Url) -> Self {
        Self { site_url }
    }
}

#[async_trait]
impl Handler for StartHandler {
    async fn handle(&self, update: &Update, sender: &dyn MessageSender) -> anyhow::Result<()> {
        let Some(msg) = update.effective_message() else {
            return Ok(());
        };
        let chat_id = msg.chat.id;

        let first_name = match msg.from.as_ref() {
            Some(user) => {
                info!(
                    "User {} (ID: {}) started bot. Chat ID: {}",
                    user.full_name(),
                    user.id,
                    chat_id
                );
                user.first_name.as_str()
            }
            None => {
                info!("Anonymous sender started bot. Chat ID: {}", chat_id);
                "there"
            }
        };

        let reply = OutboundMessage::html(chat_id, welcome_text(first_name, chat_id))
            .button("Go to UniShark Website", self.site_url.clone())
            .without_link_preview()
            .reply_to(msg.quote_target());

        sender.send(&reply).await
    }
}

fn welcome_text(first_name: &str, chat_id: ChatId) -> String {
    format!(
        "<b>👋 Welcome to UniShark Bot, {name}!</b> 🦈\n\n\
         I'm here to help you stay on top of your university tasks. \
         Here is your unique ID to connect me to your account:\n\n\
         🔑 <b>Your Personal Chat ID is:</b> <code>{chat_id}</code>\n\n\
         <b>Action Required:</b>\n\
         1️⃣ Copy the Chat ID above.\n\
         2️⃣ Go to your UniShark settings page.\n\
         3️⃣ Paste the ID into the 'Telegram Chat ID' field.\n\n\
         Once connected, I'll send you instant notifications for:\n\
         - 📝 New Assignments\n\
         - ❓ New Quizzes\n\
         - ⏰ Approaching Deadlines\n\n\
         Good luck with your studies! 🎓",
        name = html_escape(first_name),
    )
}
