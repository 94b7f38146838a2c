//! Outbound mail dispatch.

use async_trait::async_trait;
use lettre::{
    transport::smtp::authentication::Credentials, AsyncSmtpTransport, AsyncTransport, Message,
    Tokio1Executor,
};
use tracing::debug;

use crate::config::MailConfig;
use crate::error::{ConfigError, RelayError, Result};

const SERVICE: &str = "mail service";

/// Sends a fully built message.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: Message) -> Result<()>;
}

/// SMTP relay with authenticated, pooled connections.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    /// Builds a mailer from the configured credentials. Returns `Ok(None)` when
    /// either half of the credential pair is missing.
    pub fn from_config(config: &MailConfig) -> std::result::Result<Option<Self>, ConfigError> {
        let Some((username, password)) = config.credentials() else {
            return Ok(None);
        };

        let creds = Credentials::new(username.to_string(), password.to_string());
        // A bare host means implicit TLS on 465; a full `smtp://`/`smtps://`
        // URL picks its own port and TLS mode.
        let builder = if config.smtp_relay.contains("://") {
            AsyncSmtpTransport::<Tokio1Executor>::from_url(&config.smtp_relay)?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_relay)?
        };
        let transport = builder.credentials(creds).build();

        Ok(Some(Self { transport }))
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, message: Message) -> Result<()> {
        let response = self
            .transport
            .send(message)
            .await
            .map_err(classify_smtp_error)?;
        debug!(code = %response.code(), "SMTP relay accepted message");
        Ok(())
    }
}

/// A negative SMTP reply is the server refusing us; anything else means we
/// never got a usable conversation with it.
fn classify_smtp_error(err: lettre::transport::smtp::Error) -> RelayError {
    if err.is_transient() || err.is_permanent() {
        let status = err
            .status()
            .map(|code| format!("SMTP {code}"))
            .unwrap_or_else(|| "SMTP error".to_string());
        RelayError::Upstream {
            service: SERVICE,
            status,
        }
    } else {
        RelayError::Transport {
            service: SERVICE,
            reason: err.to_string(),
        }
    }
}
