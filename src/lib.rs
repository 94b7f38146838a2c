//! Server side of the portfolio site: the contact-form mail relay and the
//! chatbot webhook proxy.

pub mod chatbot;
pub mod config;
pub mod contact;
pub mod error;
pub mod mail;

use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tower_http::{set_header::SetResponseHeaderLayer, trace::TraceLayer};
use tracing::warn;

use crate::chatbot::{ChatbotProxy, HttpWebhookClient};
use crate::config::AppConfig;
use crate::contact::ContactRelay;
use crate::error::ConfigError;

pub use crate::chatbot::{chatbot_handler, WebhookClient};
pub use crate::contact::send_email_handler;
pub use crate::mail::Mailer;

const CONTENT_SECURITY_POLICY: &str = "default-src 'self'; \
script-src 'self' 'unsafe-eval' 'unsafe-inline' https://www.googletagmanager.com; \
style-src 'self' 'unsafe-inline' https://fonts.googleapis.com; \
font-src 'self' https://fonts.gstatic.com; \
img-src 'self' data: https: blob:; \
connect-src 'self' https://www.google-analytics.com https://analytics.google.com; \
frame-src 'none'; \
object-src 'none'; \
base-uri 'self'; \
form-action 'self'; \
upgrade-insecure-requests";

/// Endpoints shared by every request. Both halves are read-only.
#[derive(Clone)]
pub struct AppState {
    pub contact: Arc<ContactRelay>,
    pub chatbot: Arc<ChatbotProxy>,
}

impl AppState {
    pub fn new(contact: ContactRelay, chatbot: ChatbotProxy) -> Self {
        Self {
            contact: Arc::new(contact),
            chatbot: Arc::new(chatbot),
        }
    }

    /// Wires the real SMTP relay and webhook client. Missing credentials or
    /// webhook URL are reported, not fatal.
    pub fn from_config(config: &AppConfig) -> Result<Self, ConfigError> {
        let contact = ContactRelay::from_config(config.mail.clone())?;
        if !contact.is_configured() {
            warn!("EMAIL_USER/EMAIL_PASS not set; contact form will answer with a configuration error");
        }

        let chatbot = ChatbotProxy::new(config.chatbot.clone(), Arc::new(HttpWebhookClient::new()));
        if !chatbot.is_configured() {
            warn!("CHATBOT_WEBHOOK_URL not set; chatbot will answer with a configuration error");
        }

        Ok(Self::new(contact, chatbot))
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/send-email",
            post(send_email_handler).fallback(method_not_allowed),
        )
        .route(
            "/api/chatbot",
            post(chatbot_handler).fallback(method_not_allowed),
        )
        .route("/health", get(|| async { (StatusCode::OK, "OK") }))
        .layer(TraceLayer::new_for_http())
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::REFERRER_POLICY,
            HeaderValue::from_static("origin-when-cross-origin"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::STRICT_TRANSPORT_SECURITY,
            HeaderValue::from_static("max-age=31536000; includeSubDomains"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_XSS_PROTECTION,
            HeaderValue::from_static("1; mode=block"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::CONTENT_SECURITY_POLICY,
            HeaderValue::from_static(CONTENT_SECURITY_POLICY),
        ))
        .with_state(state)
}

async fn method_not_allowed() -> impl IntoResponse {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(json!({ "error": "Method not allowed" })),
    )
}
