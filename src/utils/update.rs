//! Update helper utilities.
//!
//! Extension traits over teloxide's update types for the questions the
//! handlers keep asking: which message is this about, is it a command,
//! should the reply quote it.

use teloxide::types::{Message, MessageEntityKind, MessageId, Update, UpdateKind};

/// Extension trait for finding the message an update acts on.
pub trait UpdateExt {
    /// The new message, else the edited one.
    fn effective_message(&self) -> Option<&Message>;

    /// Text of the effective message, if any.
    fn text(&self) -> Option<&str> {
        self.effective_message().and_then(Message::text)
    }
}

impl UpdateExt for Update {
    fn effective_message(&self) -> Option<&Message> {
        match &self.kind {
            UpdateKind::Message(msg) | UpdateKind::EditedMessage(msg) => Some(msg),
            _ => None,
        }
    }
}

/// Extension trait for message classification.
pub trait MessageExt {
    /// Whether Telegram marked a bot command at the very start of the text.
    fn starts_with_command(&self) -> bool;

    /// Message to quote in a reply: the message itself in groups, none in
    /// private chats.
    fn quote_target(&self) -> Option<MessageId>;
}

impl MessageExt for Message {
    fn starts_with_command(&self) -> bool {
        self.entities()
            .map(|entities| {
                entities
                    .iter()
                    .any(|e| e.offset == 0 && e.kind == MessageEntityKind::BotCommand)
            })
            .unwrap_or(false)
    }

    fn quote_target(&self) -> Option<MessageId> {
        (self.chat.is_group() || self.chat.is_supergroup()).then_some(self.id)
    }
}
