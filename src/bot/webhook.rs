//! Webhook HTTP endpoint.
//!
//! Routes:
//! - `GET /` and `GET /health` - liveness check, no auth
//! - `POST /:token` - Telegram update delivery, `token` must equal the bot token
//!
//! The update is fully processed before the response is sent, so the
//! status code tells Telegram whether handling succeeded.

use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::json;
use teloxide::types::{Update, UpdateKind};
use thiserror::Error;
use tracing::{debug, error, warn};

use super::dispatcher::{DispatchOutcome, Dispatcher};
use super::sender::MessageSender;

/// Failures of a single webhook delivery.
#[derive(Debug, Error)]
pub enum WebhookError {
    #[error("path token does not match the bot token")]
    Unauthorized,

    #[error("bot token is not configured")]
    Misconfigured,

    #[error("malformed update payload: {0}")]
    BadPayload(String),

    #[error("update processing failed: {0}")]
    ProcessingFailed(String),
}

impl WebhookError {
    pub fn status(&self) -> StatusCode {
        match self {
            WebhookError::Unauthorized => StatusCode::FORBIDDEN,
            // Malformed payloads answer 500 rather than 400 so Telegram keeps
            // treating them like any other failed delivery.
            WebhookError::Misconfigured
            | WebhookError::BadPayload(_)
            | WebhookError::ProcessingFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for WebhookError {
    fn into_response(self) -> Response {
        let detail = match self {
            WebhookError::Unauthorized => "Invalid token",
            _ => "Processing failed",
        };
        (self.status(), Json(json!({ "detail": detail }))).into_response()
    }
}

/// Shared, read-only state of the webhook server.
#[derive(Clone)]
pub struct WebhookState {
    secret: Arc<str>,
    dispatcher: Arc<Dispatcher>,
    sender: Arc<dyn MessageSender>,
}

impl WebhookState {
    pub fn new(secret: &str, dispatcher: Dispatcher, sender: Arc<dyn MessageSender>) -> Self {
        Self {
            secret: Arc::from(secret),
            dispatcher: Arc::new(dispatcher),
            sender,
        }
    }

    /// Authenticate, parse and dispatch one webhook delivery.
    pub async fn handle_webhook(&self, path_token: &str, body: &[u8]) -> Result<(), WebhookError> {
        if self.secret.is_empty() {
            return Err(WebhookError::Misconfigured);
        }
        if path_token != &*self.secret {
            return Err(WebhookError::Unauthorized);
        }

        let update: Update = serde_json::from_slice(body)
            .map_err(|e| WebhookError::BadPayload(e.to_string()))?;
        // teloxide keeps updates it cannot model as raw JSON.
        if let UpdateKind::Error(raw) = &update.kind {
            return Err(WebhookError::BadPayload(format!(
                "unrecognised update {}: {}",
                update.id.0, raw
            )));
        }
        debug!("Received update {}", update.id.0);

        match self.dispatcher.dispatch(&update, self.sender.as_ref()).await {
            DispatchOutcome::Handled(name) => {
                debug!("Update {} handled by {}", update.id.0, name);
                Ok(())
            }
            DispatchOutcome::NoMatch => Ok(()),
            DispatchOutcome::Failed(reason) => Err(WebhookError::ProcessingFailed(reason)),
        }
    }
}

/// Build the HTTP router.
pub fn router(state: WebhookState) -> Router {
    Router::new()
        .route("/", get(health))
        .route("/health", get(health))
        .route("/:token", post(webhook))
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "OK" }))
}

async fn webhook(
    State(state): State<WebhookState>,
    Path(token): Path<String>,
    body: Bytes,
) -> Result<&'static str, WebhookError> {
    match state.handle_webhook(&token, &body).await {
        Ok(()) => Ok("OK"),
        Err(e) => {
            match &e {
                WebhookError::Unauthorized => warn!("Rejected webhook call with invalid token"),
                // Already logged by the dispatcher.
                WebhookError::ProcessingFailed(_) => debug!("Webhook error: {}", e),
                _ => error!("Webhook error: {}", e),
            }
            Err(e)
        }
    }
}
