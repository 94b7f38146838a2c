//! Reduces whatever the webhook answered with to a single reply string.

use serde_json::Value;

/// One entry of the extraction order: a top-level field and how to read it.
pub struct ReplyRule {
    pub field: &'static str,
    pub accessor: fn(&Value) -> Option<String>,
}

/// Checked in order after the bare-string case; the first hit wins.
pub const REPLY_RULES: &[ReplyRule] = &[
    ReplyRule {
        field: "output",
        accessor: truthy_text,
    },
    ReplyRule {
        field: "message",
        accessor: truthy_text,
    },
    ReplyRule {
        field: "text",
        accessor: truthy_text,
    },
];

/// Normalizes a raw upstream body. Bodies that are not JSON are used as-is.
pub fn normalize_body(body: &str) -> String {
    match serde_json::from_str::<Value>(body) {
        Ok(value) => normalize(&value),
        Err(_) => body.to_string(),
    }
}

pub fn normalize(value: &Value) -> String {
    if let Value::String(reply) = value {
        return reply.clone();
    }

    REPLY_RULES
        .iter()
        .find_map(|rule| value.get(rule.field).and_then(rule.accessor))
        .unwrap_or_else(|| pretty(value))
}

/// `null`, `false`, `0` and `""` count as absent.
fn truthy_text(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        Value::Bool(_) | Value::Number(_) => Some(value.to_string()),
        Value::Array(_) | Value::Object(_) => Some(pretty(value)),
    }
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}
