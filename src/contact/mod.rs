//! Contact form mail relay.

pub mod submission;
pub mod template;

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Datelike;
use lettre::{
    message::{header::ContentType, Mailbox, MultiPart, SinglePart},
    Address, Message,
};
use serde::Serialize;
use serde_json::json;
use tracing::{info, instrument};

use crate::config::MailConfig;
use crate::error::{ConfigError, RelayError, Result};
use crate::mail::{Mailer, SmtpMailer};
use crate::AppState;

pub use submission::{ContactPayload, ContactSubmission};

const SENDER_NAME: &str = "Portfolio Contact Form";

/// Validates submissions and hands the rendered email to a [`Mailer`].
pub struct ContactRelay {
    config: MailConfig,
    mailer: Option<Arc<dyn Mailer>>,
}

#[derive(Debug, Serialize)]
struct SentResponse {
    message: &'static str,
}

impl ContactRelay {
    pub fn new(config: MailConfig, mailer: Option<Arc<dyn Mailer>>) -> Self {
        Self { config, mailer }
    }

    /// Wires the SMTP relay described by `config`, if credentials are set.
    pub fn from_config(config: MailConfig) -> std::result::Result<Self, ConfigError> {
        let mailer = SmtpMailer::from_config(&config)?.map(|m| Arc::new(m) as Arc<dyn Mailer>);
        Ok(Self::new(config, mailer))
    }

    pub fn is_configured(&self) -> bool {
        self.mailer.is_some()
    }

    pub async fn relay(&self, payload: ContactPayload) -> Result<()> {
        let submission = ContactSubmission::validate(payload)?;

        let mailer = self
            .mailer
            .as_ref()
            .ok_or(RelayError::Configuration("EMAIL_USER/EMAIL_PASS"))?;
        let message = self.compose(&submission)?;

        mailer.send(message).await?;
        info!(reply_to = %submission.email(), "Contact email sent");
        Ok(())
    }

    /// Builds the operator-bound message with `Reply-To` pointing at the
    /// submitter.
    pub fn compose(&self, submission: &ContactSubmission) -> Result<Message> {
        let sender = parse_configured_address(self.config.username.as_deref(), "EMAIL_USER")?;
        let recipient = parse_configured_address(self.config.recipient(), "CONTACT_RECIPIENT")?;
        let reply_to = submission
            .email()
            .parse::<Address>()
            .map_err(|_| RelayError::Validation("Invalid email format".to_string()))?;

        let year = chrono::Utc::now().year();

        Message::builder()
            .from(Mailbox::new(Some(SENDER_NAME.to_string()), sender))
            .reply_to(Mailbox::new(None, reply_to))
            .to(Mailbox::new(None, recipient))
            .subject(template::subject(submission))
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(template::render_text(submission)),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(template::render_html(submission, &self.config, year)),
                    ),
            )
            .map_err(|e| RelayError::Internal(format!("failed to build email: {e}")))
    }
}

fn parse_configured_address(value: Option<&str>, setting: &'static str) -> Result<Address> {
    value
        .ok_or(RelayError::Configuration(setting))?
        .parse::<Address>()
        .map_err(|_| RelayError::Configuration(setting))
}

/// POST /api/send-email
#[instrument(skip_all)]
pub async fn send_email_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<ContactPayload>, JsonRejection>,
) -> std::result::Result<impl IntoResponse, ContactError> {
    let Json(payload) = payload.map_err(|rejection| {
        RelayError::Validation(format!("Invalid request body: {}", rejection.body_text()))
    })?;

    state.contact.relay(payload).await?;

    Ok((
        StatusCode::OK,
        Json(SentResponse {
            message: "Email sent successfully",
        }),
    ))
}

/// Renders a [`RelayError`] as the contact form's `{error, details}` body.
pub struct ContactError(RelayError);

impl From<RelayError> for ContactError {
    fn from(err: RelayError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ContactError {
    fn into_response(self) -> Response {
        let err = self.0;
        err.log("send-email");

        let status = err.status();
        let body = match &err {
            RelayError::Validation(reason) => json!({ "error": reason }),
            other => json!({
                "error": "Failed to send email",
                "details": public_details(other),
            }),
        };

        (status, Json(body)).into_response()
    }
}

fn public_details(err: &RelayError) -> &'static str {
    match err {
        RelayError::Configuration(_) => "The mail service is not configured",
        RelayError::Upstream { .. } => "The mail service rejected the message",
        RelayError::Transport { .. } => "The mail service is unreachable",
        _ => "Unexpected server error",
    }
}
