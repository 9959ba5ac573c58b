//! Utility functions.

pub mod update;

pub use update::{MessageExt, UpdateExt};

/// Escape text for interpolation into an HTML-formatted message.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
