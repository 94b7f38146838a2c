//! Process configuration, read once at startup and handed to the endpoints.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use crate::error::ConfigError;

const DEFAULT_PORT: u16 = 4500;
const DEFAULT_SMTP_RELAY: &str = "smtp.gmail.com";
const DEFAULT_OWNER_NAME: &str = "Portfolio Owner";
const DEFAULT_OWNER_TITLE: &str = "Full Stack Developer & Software Engineer";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub mail: MailConfig,
    pub chatbot: ChatbotConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct MailConfig {
    pub smtp_relay: String,
    pub username: Option<String>,
    pub password: Option<String>,
    /// Operator address receiving submissions. Falls back to `username`.
    pub recipient: Option<String>,
    pub owner_name: String,
    pub owner_title: String,
    pub portfolio_url: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ChatbotConfig {
    pub webhook_url: Option<String>,
}

impl AppConfig {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup. Blank values
    /// count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let host = match get("HOST") {
            Some(value) => value.parse::<IpAddr>().map_err(|_| ConfigError::Invalid {
                name: "HOST",
                value,
            })?,
            None => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
        };

        let port = match get("PORT") {
            Some(value) => value.parse::<u16>().map_err(|_| ConfigError::Invalid {
                name: "PORT",
                value,
            })?,
            None => DEFAULT_PORT,
        };

        let mail = MailConfig {
            smtp_relay: get("SMTP_RELAY").unwrap_or_else(|| DEFAULT_SMTP_RELAY.to_string()),
            username: get("EMAIL_USER"),
            password: get("EMAIL_PASS"),
            recipient: get("CONTACT_RECIPIENT"),
            owner_name: get("CONTACT_OWNER_NAME").unwrap_or_else(|| DEFAULT_OWNER_NAME.to_string()),
            owner_title: get("CONTACT_OWNER_TITLE")
                .unwrap_or_else(|| DEFAULT_OWNER_TITLE.to_string()),
            portfolio_url: get("PORTFOLIO_URL"),
        };

        let chatbot = ChatbotConfig {
            webhook_url: get("CHATBOT_WEBHOOK_URL").or_else(|| get("N8N_WEBHOOK_URL")),
        };

        Ok(Self {
            server: ServerConfig { host, port },
            mail,
            chatbot,
        })
    }
}

impl ServerConfig {
    pub fn bind_address(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl MailConfig {
    /// The SMTP credential pair, when both halves are present.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => Some((user.as_str(), pass.as_str())),
            _ => None,
        }
    }

    pub fn recipient(&self) -> Option<&str> {
        self.recipient.as_deref().or(self.username.as_deref())
    }
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            smtp_relay: DEFAULT_SMTP_RELAY.to_string(),
            username: None,
            password: None,
            recipient: None,
            owner_name: DEFAULT_OWNER_NAME.to_string(),
            owner_title: DEFAULT_OWNER_TITLE.to_string(),
            portfolio_url: None,
        }
    }
}
