use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;

use crate::error::{RelayError, Result};

lazy_static! {
    static ref EMAIL_PATTERN: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();
}

/// Contact form body as posted by the browser. Every field is optional here
/// so that a missing field becomes a field-specific 400 instead of a
/// deserialization rejection.
#[derive(Debug, Default, Deserialize)]
pub struct ContactPayload {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub message: Option<String>,
}

/// A submission that passed validation. Only constructed through
/// [`ContactSubmission::validate`].
#[derive(Debug, Clone)]
pub struct ContactSubmission {
    name: String,
    email: String,
    phone: Option<String>,
    message: String,
}

impl ContactSubmission {
    pub fn validate(payload: ContactPayload) -> Result<Self> {
        let name = required(payload.name, "Name")?;
        let email = payload.email.unwrap_or_default();
        if email.trim().is_empty() {
            return Err(RelayError::Validation("Email is required".to_string()));
        }
        let message = required(payload.message, "Message")?;

        // Matched untrimmed: surrounding whitespace is a format error.
        if !is_valid_email(&email) {
            return Err(RelayError::Validation("Invalid email format".to_string()));
        }

        let phone = payload
            .phone
            .map(|phone| phone.trim().to_string())
            .filter(|phone| !phone.is_empty());

        Ok(Self {
            name,
            email,
            phone,
            message,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

fn required(value: Option<String>, field: &str) -> Result<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .ok_or_else(|| RelayError::Validation(format!("{field} is required")))
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}
