//! Request validation for submitted messages.

use crate::model::{MessageFields, MessageRequest};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::OnceLock;

pub const NAME_MAX_CHARS: usize = 120;
pub const EMAIL_MAX_CHARS: usize = 180;
pub const MESSAGE_MAX_CHARS: usize = 2000;

// Local part, '@', then one or more dot-separated domain labels.
const EMAIL_PATTERN: &str = r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)*$";

/// Violated constraint per field, keyed by field name.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    fn add(&mut self, field: &str, reason: String) {
        self.0.entry(field.to_string()).or_insert(reason);
    }
}

pub struct MessageValidator;

impl MessageValidator {
    /// Check every field and collect all violations; only returns fields when all pass.
    pub fn validate(request: MessageRequest) -> Result<MessageFields, FieldErrors> {
        let mut errors = FieldErrors::default();
        let name = required(&mut errors, "name", request.name, NAME_MAX_CHARS);
        let email = required(&mut errors, "email", request.email, EMAIL_MAX_CHARS);
        let message = required(&mut errors, "message", request.message, MESSAGE_MAX_CHARS);

        if let Some(email) = &email {
            if !email_pattern().is_match(email) {
                errors.add("email", "deve ser um endereço de e-mail bem formado".into());
            }
        }

        match (name, email, message) {
            (Some(name), Some(email), Some(message)) if errors.is_empty() => Ok(MessageFields {
                name,
                email,
                message,
            }),
            _ => Err(errors),
        }
    }
}

fn required(errors: &mut FieldErrors, field: &str, value: Option<String>, max: usize) -> Option<String> {
    let value = match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => {
            errors.add(field, "não deve estar em branco".into());
            return None;
        }
    };
    // Limits count Unicode scalar values, not bytes or grapheme clusters.
    if value.chars().count() > max {
        errors.add(field, format!("tamanho deve ser no máximo {}", max));
        return None;
    }
    Some(value)
}

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(EMAIL_PATTERN).expect("email pattern is a valid regex"))
}
