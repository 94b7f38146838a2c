#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use lettre::Message;
use portfolio_relay::{
    chatbot::ChatbotProxy,
    config::{ChatbotConfig, MailConfig},
    contact::ContactRelay,
    error::{RelayError, Result},
    router, AppState, Mailer, WebhookClient,
};
use serde_json::Value;
use tower::ServiceExt;

/// Keeps every message it is asked to send.
#[derive(Default)]
pub struct RecordingMailer {
    pub sent: Mutex<Vec<Message>>,
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, message: Message) -> Result<()> {
        self.sent.lock().unwrap().push(message);
        Ok(())
    }
}

impl RecordingMailer {
    pub fn count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

/// Always fails the way a refusing SMTP server does.
pub struct RejectingMailer;

#[async_trait]
impl Mailer for RejectingMailer {
    async fn send(&self, _message: Message) -> Result<()> {
        Err(RelayError::Upstream {
            service: "mail service",
            status: "SMTP 535".to_string(),
        })
    }
}

/// Fails the way an unreachable SMTP server does.
pub struct UnreachableMailer;

#[async_trait]
impl Mailer for UnreachableMailer {
    async fn send(&self, _message: Message) -> Result<()> {
        Err(RelayError::Transport {
            service: "mail service",
            reason: "connection refused by smtp.gmail.com:465".to_string(),
        })
    }
}

/// Counts calls and never touches the network.
#[derive(Default)]
pub struct CountingWebhook {
    pub calls: AtomicUsize,
}

#[async_trait]
impl WebhookClient for CountingWebhook {
    async fn post(&self, _url: &str, _body: &Value) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(r#"{"output":"counted"}"#.to_string())
    }
}

impl CountingWebhook {
    pub fn count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

pub fn mail_config() -> MailConfig {
    MailConfig {
        username: Some("relay@example.com".to_string()),
        password: Some("app-password".to_string()),
        recipient: Some("owner@example.com".to_string()),
        owner_name: "Ada Lovelace".to_string(),
        ..MailConfig::default()
    }
}

pub fn app_with(
    mailer: Option<Arc<dyn Mailer>>,
    webhook_url: Option<String>,
    webhook: Arc<dyn WebhookClient>,
) -> Router {
    let contact = ContactRelay::new(mail_config(), mailer);
    let chatbot = ChatbotProxy::new(ChatbotConfig { webhook_url }, webhook);
    router(AppState::new(contact, chatbot))
}

pub async fn send(app: Router, method: Method, uri: &str, body: Option<String>) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    if body.is_some() {
        request = request.header("content-type", "application/json");
    }
    let request = request
        .body(body.map(Body::from).unwrap_or_else(Body::empty))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, json)
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, Method::POST, uri, Some(body.to_string())).await
}
