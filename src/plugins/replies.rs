//! Fixed text replies.
//!
//! A tiny lookup table over plain text messages. Rules are checked in
//! order and only the first match replies; anything else is ignored.

use async_trait::async_trait;
use teloxide::types::Update;
use tracing::debug;

use crate::bot::dispatcher::Handler;
use crate::bot::sender::MessageSender;
use crate::models::OutboundMessage;
use crate::utils::{MessageExt, UpdateExt};

/// How a rule compares against the message text.
#[derive(Debug, Clone, Copy)]
enum Trigger {
    Exact(&'static str),
    Contains(&'static str),
}

impl Trigger {
    fn matches(self, text: &str) -> bool {
        match self {
            Trigger::Exact(s) => text == s,
            Trigger::Contains(s) => text.contains(s),
        }
    }
}

const RULES: &[(Trigger, &str)] = &[
    (Trigger::Exact("كسمك"), "الله يسامحك"),
    (Trigger::Contains("حرفوش"), "حرفوش عمك"),
];

/// Reply for `text`, if any rule matches.
pub fn reply_for(text: &str) -> Option<&'static str> {
    first_reply(RULES, text)
}

fn first_reply(rules: &[(Trigger, &'static str)], text: &str) -> Option<&'static str> {
    rules
        .iter()
        .find(|(trigger, _)| trigger.matches(text))
        .map(|(_, reply)| *reply)
}

/// Handles plain text messages.
pub struct TextReplyHandler;

#[async_trait]
impl Handler for TextReplyHandler {
    async fn handle(&self, update: &Update, sender: &dyn MessageSender) -> anyhow::Result<()> {
        let Some(msg) = update.effective_message() else {
            return Ok(());
        };
        let Some(reply) = msg.text().and_then(reply_for) else {
            debug!("No reply rule for message in chat {}", msg.chat.id);
            return Ok(());
        };

        let out = OutboundMessage::text(msg.chat.id, reply).reply_to(msg.quote_target());
        sender.send(&out).await
    }
}
