//! Outbound message built by handlers.

use teloxide::types::{ChatId, MessageId};
use url::Url;

/// How the body should be rendered by Telegram.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TextFormat {
    #[default]
    Plain,
    Html,
}

/// An inline button that opens a URL.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LinkButton {
    pub label: String,
    pub url: Url,
}

/// A message to send. Never persisted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutboundMessage {
    pub chat_id: ChatId,
    pub text: String,
    pub format: TextFormat,
    /// Rendered one button per keyboard row.
    pub buttons: Vec<LinkButton>,
    pub disable_link_preview: bool,
    /// Message to quote, if any.
    pub reply_to: Option<MessageId>,
}

impl OutboundMessage {
    /// Plain text message with no extras.
    pub fn text(chat_id: ChatId, text: impl Into<String>) -> Self {
        Self {
            chat_id,
            text: text.into(),
            format: TextFormat::Plain,
            buttons: Vec::new(),
            disable_link_preview: false,
            reply_to: None,
        }
    }

    /// HTML-formatted message.
    pub fn html(chat_id: ChatId, text: impl Into<String>) -> Self {
        Self {
            format: TextFormat::Html,
            ..Self::text(chat_id, text)
        }
    }

    pub fn button(mut self, label: impl Into<String>, url: Url) -> Self {
        self.buttons.push(LinkButton {
            label: label.into(),
            url,
        });
        self
    }

    pub fn without_link_preview(mut self) -> Self {
        self.disable_link_preview = true;
        self
    }

    pub fn reply_to(mut self, message_id: Option<MessageId>) -> Self {
        self.reply_to = message_id;
        self
    }
}
