//! Chatbot proxy: forwards the visitor's message to an automation webhook.

pub mod reply;
pub mod webhook;

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::config::ChatbotConfig;
use crate::error::{RelayError, Result};
use crate::AppState;

pub use webhook::{HttpWebhookClient, WebhookClient};

const UNREACHABLE_REPLY: &str = "I'm currently unable to connect to my knowledge base. \
Please make sure the backend service is running or try again later.";

pub struct ChatbotProxy {
    webhook_url: Option<String>,
    client: Arc<dyn WebhookClient>,
}

#[derive(Debug, Serialize)]
pub struct ChatReply {
    pub reply: String,
}

impl ChatbotProxy {
    pub fn new(config: ChatbotConfig, client: Arc<dyn WebhookClient>) -> Self {
        Self {
            webhook_url: config.webhook_url,
            client,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.webhook_url.is_some()
    }

    /// Forwards `body` unchanged and returns the normalized reply.
    pub async fn ask(&self, body: &Value) -> Result<String> {
        let url = self
            .webhook_url
            .as_deref()
            .ok_or(RelayError::Configuration("CHATBOT_WEBHOOK_URL"))?;

        let raw = self.client.post(url, body).await?;
        Ok(reply::normalize_body(&raw))
    }
}

/// POST /api/chatbot
#[instrument(skip_all)]
pub async fn chatbot_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<Value>, JsonRejection>,
) -> std::result::Result<Json<ChatReply>, ChatError> {
    // Configuration first: no body inspection, no outbound call.
    if !state.chatbot.is_configured() {
        return Err(RelayError::Configuration("CHATBOT_WEBHOOK_URL").into());
    }

    let Json(body) = payload.map_err(|rejection| {
        RelayError::Validation(format!("Invalid request body: {}", rejection.body_text()))
    })?;
    debug!(payload = %body, "Forwarding chat message");

    let reply = state.chatbot.ask(&body).await?;
    Ok(Json(ChatReply { reply }))
}

/// Renders a [`RelayError`] as the chatbot's `{reply}` body.
pub struct ChatError(RelayError);

impl From<RelayError> for ChatError {
    fn from(err: RelayError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ChatError {
    fn into_response(self) -> Response {
        let err = self.0;
        err.log("chatbot");

        let reply = match &err {
            RelayError::Validation(_) => "Invalid request body.".to_string(),
            RelayError::Configuration(_) => "Server configuration error.".to_string(),
            RelayError::Upstream { status, .. } => format!("Webhook error: {status}"),
            RelayError::Transport { .. } => UNREACHABLE_REPLY.to_string(),
            RelayError::Internal(_) => "Server error. Please try again.".to_string(),
        };

        (err.status(), Json(ChatReply { reply })).into_response()
    }
}
