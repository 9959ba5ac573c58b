//! Update dispatcher.
//!
//! Holds an ordered list of (predicate, handler) rules and runs the first
//! rule whose predicate accepts the update. Only one handler ever runs per
//! update.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use async_trait::async_trait;
use futures::FutureExt;
use teloxide::types::Update;
use tracing::{debug, error};

use super::sender::MessageSender;
use crate::config::Config;
use crate::plugins;

/// A unit of logic bound to a predicate in the dispatcher.
#[async_trait]
pub trait Handler: Send + Sync {
    async fn handle(&self, update: &Update, sender: &dyn MessageSender) -> anyhow::Result<()>;
}

/// Predicate deciding whether a rule applies to an update.
pub type Predicate = Box<dyn Fn(&Update) -> bool + Send + Sync>;

/// Result of dispatching one update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The named handler ran to completion.
    Handled(&'static str),
    /// No predicate matched. Normal flow, not an error.
    NoMatch,
    /// The selected handler returned an error or panicked.
    Failed(String),
}

struct Rule {
    name: &'static str,
    predicate: Predicate,
    handler: Arc<dyn Handler>,
}

/// Immutable first-match dispatcher.
pub struct Dispatcher {
    rules: Vec<Rule>,
}

/// Collects rules in registration order.
#[derive(Default)]
pub struct DispatcherBuilder {
    rules: Vec<Rule>,
}

impl DispatcherBuilder {
    /// Add a rule. Rules are evaluated in the order they are registered.
    pub fn register<P, H>(mut self, name: &'static str, predicate: P, handler: H) -> Self
    where
        P: Fn(&Update) -> bool + Send + Sync + 'static,
        H: Handler + 'static,
    {
        self.rules.push(Rule {
            name,
            predicate: Box::new(predicate),
            handler: Arc::new(handler),
        });
        self
    }

    pub fn build(self) -> Dispatcher {
        Dispatcher { rules: self.rules }
    }
}

impl Dispatcher {
    pub fn builder() -> DispatcherBuilder {
        DispatcherBuilder::default()
    }

    /// Run the first matching handler for `update`.
    pub async fn dispatch(&self, update: &Update, sender: &dyn MessageSender) -> DispatchOutcome {
        let Some(rule) = self.rules.iter().find(|r| (r.predicate)(update)) else {
            debug!("update {}: no handler matched", update.id.0);
            return DispatchOutcome::NoMatch;
        };

        debug!("update {}: routed to {}", update.id.0, rule.name);

        let run = AssertUnwindSafe(rule.handler.handle(update, sender)).catch_unwind();
        match run.await {
            Ok(Ok(())) => DispatchOutcome::Handled(rule.name),
            Ok(Err(e)) => {
                error!("Handler {} failed on update {}: {:#}", rule.name, update.id.0, e);
                DispatchOutcome::Failed(e.to_string())
            }
            Err(_) => {
                error!("Handler {} panicked on update {}", rule.name, update.id.0);
                DispatchOutcome::Failed(format!("{} panicked", rule.name))
            }
        }
    }
}

/// Build the dispatcher with all handlers.
///
/// Commands are registered before the catch-all text handler so they are
/// never swallowed by it.
pub fn build_dispatcher(config: &Config, bot_username: String) -> Dispatcher {
    Dispatcher::builder()
        .register(
            "start",
            move |update: &Update| plugins::is_start_command(update, &bot_username),
            plugins::start::StartHandler::new(config.site_url.clone()),
        )
        .register(
            "text_reply",
            plugins::is_plain_text,
            plugins::replies::TextReplyHandler,
        )
        .build()
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use teloxide::types::ChatId;

    use super::*;
    use crate::bot::sender::testing::RecordingSender;
    use crate::models::OutboundMessage;
    use crate::utils::update::testing::private_text;

    fn update(text: &str) -> Update {
        private_text(42, text)
    }

    /// Replies with a fixed text and counts its invocations.
    struct Echo {
        reply: &'static str,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl Handler for Echo {
        async fn handle(&self, update: &Update, sender: &dyn MessageSender) -> anyhow::Result<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let chat_id = update.chat().map(|c| c.id).unwrap_or(ChatId(0));
            sender.send(&OutboundMessage::text(chat_id, self.reply)).await
        }
    }

    struct Broken;

    #[async_trait]
    impl Handler for Broken {
        async fn handle(&self, _: &Update, _: &dyn MessageSender) -> anyhow::Result<()> {
            anyhow::bail!("boom")
        }
    }

    struct Panics;

    #[async_trait]
    impl Handler for Panics {
        async fn handle(&self, _: &Update, _: &dyn MessageSender) -> anyhow::Result<()> {
            panic!("handler bug")
        }
    }

    #[tokio::test]
    async fn test_first_match_wins() {
        let first = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));
        let dispatcher = Dispatcher::builder()
            .register("first", |_: &Update| true, Echo { reply: "one", calls: first.clone() })
            .register("second", |_: &Update| true, Echo { reply: "two", calls: second.clone() })
            .build();
        let sender = RecordingSender::new();

        let outcome = dispatcher.dispatch(&update("/start"), &sender).await;

        assert_eq!(outcome, DispatchOutcome::Handled("first"));
        assert_eq!(first.load(Ordering::SeqCst), 1);
        assert_eq!(second.load(Ordering::SeqCst), 0);
        assert_eq!(sender.sent(), vec![OutboundMessage::text(ChatId(42), "one")]);
    }

    #[tokio::test]
    async fn test_skips_rejecting_predicates() {
        let calls = Arc::new(AtomicUsize::new(0));
        let dispatcher = Dispatcher::builder()
            .register("never", |_: &Update| false, Broken)
            .register("echo", |_: &Update| true, Echo { reply: "hi", calls: calls.clone() })
            .build();

        let outcome = dispatcher.dispatch(&update("hello"), &RecordingSender::new()).await;

        assert_eq!(outcome, DispatchOutcome::Handled("echo"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_no_match() {
        let dispatcher = Dispatcher::builder()
            .register("never", |_: &Update| false, Broken)
            .build();
        let sender = RecordingSender::new();

        assert_eq!(
            dispatcher.dispatch(&update("hello"), &sender).await,
            DispatchOutcome::NoMatch
        );
        assert!(sender.sent().is_empty());
        assert_eq!(
            Dispatcher::builder().build().dispatch(&update("x"), &sender).await,
            DispatchOutcome::NoMatch
        );
    }

    #[tokio::test]
    async fn test_handler_error_and_panic_become_failed() {
        let sender = RecordingSender::new();

        let broken = Dispatcher::builder().register("broken", |_: &Update| true, Broken).build();
        assert_eq!(
            broken.dispatch(&update("x"), &sender).await,
            DispatchOutcome::Failed("boom".to_string())
        );

        let panics = Dispatcher::builder().register("panics", |_: &Update| true, Panics).build();
        assert!(matches!(
            panics.dispatch(&update("x"), &sender).await,
            DispatchOutcome::Failed(_)
        ));
    }

    #[tokio::test]
    async fn test_send_failure_becomes_failed() {
        let calls = Arc::new(AtomicUsize::new(0));
        let dispatcher = Dispatcher::builder()
            .register("echo", |_: &Update| true, Echo { reply: "hi", calls })
            .build();

        let outcome = dispatcher.dispatch(&update("x"), &RecordingSender::failing()).await;

        assert!(matches!(outcome, DispatchOutcome::Failed(_)));
    }

    #[tokio::test]
    async fn test_command_registered_before_text() {
        let config = Config::from_lookup(|k| (k == "BOT_TOKEN").then(|| "t".to_string())).unwrap();
        let dispatcher = build_dispatcher(&config, "unishark_bot".to_string());
        let sender = RecordingSender::new();

        assert_eq!(
            dispatcher.dispatch(&update("/start"), &sender).await,
            DispatchOutcome::Handled("start")
        );
        assert_eq!(
            dispatcher.dispatch(&update("حرفوش"), &sender).await,
            DispatchOutcome::Handled("text_reply")
        );
        assert_eq!(
            dispatcher.dispatch(&update("/help"), &sender).await,
            DispatchOutcome::NoMatch
        );
    }
}
