//! Outbound message model built by handlers.

pub mod outbound;

pub use outbound::{OutboundMessage, TextFormat};
