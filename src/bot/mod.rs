//! Bot module - Core bot functionality.

pub mod dispatcher;
mod runtime;
pub mod sender;
pub mod webhook;

pub use dispatcher::build_dispatcher;
pub use runtime::run;
pub use sender::TelegramSender;
pub use webhook::WebhookState;
