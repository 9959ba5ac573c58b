//! Outbound send capability.
//!
//! [`MessageSender`] is what handlers talk to; [`TelegramSender`] implements
//! it with a single long-lived teloxide client shared by every request.

use std::time::Duration;

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{
    InlineKeyboardButton, InlineKeyboardMarkup, LinkPreviewOptions, ParseMode, ReplyParameters,
};

use crate::models::{OutboundMessage, TextFormat};

/// Delivers outbound messages to the chat platform.
#[async_trait]
pub trait MessageSender: Send + Sync {
    async fn send(&self, message: &OutboundMessage) -> anyhow::Result<()>;
}

/// Teloxide-based implementation of [`MessageSender`].
#[derive(Clone)]
pub struct TelegramSender {
    bot: Bot,
}

impl TelegramSender {
    /// Build a client with the given token and request timeout.
    pub fn new(token: &str, timeout: Duration) -> anyhow::Result<Self> {
        let client = teloxide::net::default_reqwest_settings()
            .timeout(timeout)
            .build()?;

        Ok(Self {
            bot: Bot::with_client(token, client),
        })
    }

    /// The underlying bot, for startup calls like `getMe` and `setWebhook`.
    pub fn bot(&self) -> &Bot {
        &self.bot
    }
}

#[async_trait]
impl MessageSender for TelegramSender {
    async fn send(&self, message: &OutboundMessage) -> anyhow::Result<()> {
        let mut request = self.bot.send_message(message.chat_id, &message.text);

        if message.format == TextFormat::Html {
            request = request.parse_mode(ParseMode::Html);
        }

        if !message.buttons.is_empty() {
            let rows = message
                .buttons
                .iter()
                .map(|b| vec![InlineKeyboardButton::url(b.label.clone(), b.url.clone())]);
            request = request.reply_markup(InlineKeyboardMarkup::new(rows));
        }

        if message.disable_link_preview {
            request = request.link_preview_options(LinkPreviewOptions {
                is_disabled: true,
                url: None,
                prefer_small_media: false,
                prefer_large_media: false,
                show_above_text: false,
            });
        }

        if let Some(id) = message.reply_to {
            request = request.reply_parameters(ReplyParameters::new(id));
        }

        request.await?;
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_telegram_sender_new() {
        let sender = TelegramSender::new("123:dummy", Duration::from_secs(7)).unwrap();
        assert_eq!(sender.bot().token(), "123:dummy");
    }
}
