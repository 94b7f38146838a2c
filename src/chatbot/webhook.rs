use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::error::{RelayError, Result};

const SERVICE: &str = "webhook";

/// Posts a JSON body to a webhook and returns the raw response text.
#[async_trait]
pub trait WebhookClient: Send + Sync {
    async fn post(&self, url: &str, body: &Value) -> Result<String>;
}

#[derive(Clone, Default)]
pub struct HttpWebhookClient {
    client: reqwest::Client,
}

impl HttpWebhookClient {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl WebhookClient for HttpWebhookClient {
    async fn post(&self, url: &str, body: &Value) -> Result<String> {
        let res = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(classify_request_error)?;

        let status = res.status();
        if !status.is_success() {
            return Err(RelayError::Upstream {
                service: SERVICE,
                status: status_line(status),
            });
        }

        let text = res.text().await.map_err(classify_request_error)?;
        debug!(%status, bytes = text.len(), "Webhook responded");
        Ok(text)
    }
}

/// `<code> <reason>`, or just the code when the status has no canonical reason.
fn status_line(status: reqwest::StatusCode) -> String {
    match status.canonical_reason() {
        Some(reason) => format!("{} {reason}", status.as_u16()),
        None => status.as_u16().to_string(),
    }
}

fn classify_request_error(err: reqwest::Error) -> RelayError {
    if err.is_connect() || err.is_timeout() {
        RelayError::Transport {
            service: SERVICE,
            reason: err.to_string(),
        }
    } else {
        RelayError::Internal(format!("webhook request failed: {err}"))
    }
}
