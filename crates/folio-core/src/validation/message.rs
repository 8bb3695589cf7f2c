use serde_json::Value;
use validator::ValidateEmail;

use super::{FieldReader, Mode};
use crate::error::FieldErrors;
use crate::sanitize::sanitize_plain_text;

pub const MIN_MESSAGE_LENGTH: usize = 5;

/// Validated contact form submission. `message` is already stripped of markup.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMessage {
    pub email: String,
    pub message: String,
}

/// Validate a contact form payload.
pub fn validate_message(payload: &Value) -> Result<NewMessage, FieldErrors> {
    let mut reader = FieldReader::new(payload, Mode::Create);

    let email = reader.text("email", true).and_then(|email| {
        if email.validate_email() {
            Some(email)
        } else {
            reader.error("email", "must be a valid email address");
            None
        }
    });

    // Length rules apply to the text that will be stored.
    let message = reader.text("message", true).and_then(|raw| {
        let message = sanitize_plain_text(&raw).trim().to_string();
        if message.is_empty() {
            reader.error("message", "must not be empty");
            None
        } else if message.chars().count() < MIN_MESSAGE_LENGTH {
            reader.error(
                "message",
                format!("must be at least {MIN_MESSAGE_LENGTH} characters"),
            );
            None
        } else {
            Some(message)
        }
    });

    reader.finish(NewMessage {
        email: email.unwrap_or_default(),
        message: message.unwrap_or_default(),
    })
}
