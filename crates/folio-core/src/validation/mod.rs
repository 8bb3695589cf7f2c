//! Payload validation.
//!
//! Request bodies arrive as untyped JSON. Each entity schema walks the object
//! field by field, records every violated rule in [`FieldErrors`] and only
//! yields a typed value when nothing failed. Unknown fields are ignored.

mod message;
mod post;
mod project;

use serde_json::{Map, Value};
use validator::ValidateUrl;

use crate::error::FieldErrors;

pub use message::{NewMessage, validate_message};
pub use post::{
    MAX_TAG_LENGTH, MAX_TAGS, NewPost, PostPatch, normalize_tags, validate_new_post,
    validate_post_patch,
};
pub use project::{NewProject, ProjectPatch, validate_new_project, validate_project_patch};

/// Field that collects errors about the payload as a whole.
pub const PAYLOAD_FIELD: &str = "_payload";

/// Whether required fields must be present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Full creation: required fields are mandatory.
    Create,
    /// Partial update: every field is optional, but validated when present.
    Update,
}

/// Walks a JSON object and accumulates field errors.
pub(crate) struct FieldReader<'a> {
    fields: Option<&'a Map<String, Value>>,
    mode: Mode,
    errors: FieldErrors,
}

impl<'a> FieldReader<'a> {
    pub(crate) fn new(payload: &'a Value, mode: Mode) -> Self {
        let mut errors = FieldErrors::new();
        let fields = payload.as_object();
        if fields.is_none() {
            errors.add(PAYLOAD_FIELD, "expected a JSON object");
        }
        Self {
            fields,
            mode,
            errors,
        }
    }

    pub(crate) fn error(&mut self, field: &str, message: impl Into<String>) {
        self.errors.add(field, message);
    }

    /// Present, non-null value. A missing required field is recorded here.
    pub(crate) fn value(&mut self, field: &str, required: bool) -> Option<&'a Value> {
        let fields = self.fields?;
        match fields.get(field) {
            Some(Value::Null) | None => {
                if required && self.mode == Mode::Create {
                    self.errors.add(field, "is required");
                }
                None
            }
            Some(value) => Some(value),
        }
    }

    /// Non-blank string, returned as sent.
    pub(crate) fn raw_string(&mut self, field: &str, required: bool) -> Option<&'a str> {
        match self.value(field, required)? {
            Value::String(s) if s.trim().is_empty() => {
                self.errors.add(field, "must not be empty");
                None
            }
            Value::String(s) => Some(s.as_str()),
            _ => {
                self.errors.add(field, "must be a string");
                None
            }
        }
    }

    /// Non-blank string, trimmed.
    pub(crate) fn text(&mut self, field: &str, required: bool) -> Option<String> {
        self.raw_string(field, required).map(|s| s.trim().to_string())
    }

    pub(crate) fn boolean(&mut self, field: &str) -> Option<bool> {
        match self.value(field, false)? {
            Value::Bool(b) => Some(*b),
            _ => {
                self.errors.add(field, "must be a boolean");
                None
            }
        }
    }

    /// Array whose elements must all be strings.
    pub(crate) fn string_array(&mut self, field: &str, required: bool) -> Option<Vec<&'a str>> {
        let Value::Array(items) = self.value(field, required)? else {
            self.errors.add(field, "must be an array of strings");
            return None;
        };

        let mut out = Vec::with_capacity(items.len());
        let mut ok = true;
        for (index, item) in items.iter().enumerate() {
            match item.as_str() {
                Some(s) => out.push(s),
                None => {
                    self.errors
                        .add(field, format!("item {index} must be a string"));
                    ok = false;
                }
            }
        }
        ok.then_some(out)
    }

    /// Optional http(s) URL.
    ///
    /// `Some(None)` means "clear the stored value" and is only produced in
    /// update mode, for an explicit `null` or an empty string.
    pub(crate) fn url(&mut self, field: &str) -> Option<Option<String>> {
        let fields = self.fields?;
        let cleared = match self.mode {
            Mode::Update => Some(None),
            Mode::Create => None,
        };
        match fields.get(field)? {
            Value::Null => cleared,
            Value::String(s) if s.trim().is_empty() => cleared,
            Value::String(s) => {
                let url = s.trim();
                if is_http_url(url) {
                    Some(Some(url.to_string()))
                } else {
                    self.errors.add(field, "must be a valid http(s) URL");
                    None
                }
            }
            _ => {
                self.errors.add(field, "must be a string");
                None
            }
        }
    }

    pub(crate) fn finish<T>(self, value: T) -> Result<T, FieldErrors> {
        self.errors.into_result(value)
    }
}

fn is_http_url(url: &str) -> bool {
    url.validate_url() && (url.starts_with("https://") || url.starts_with("http://"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_non_object_payload_rejected() {
        let payload = json!(["not", "an", "object"]);
        let reader = FieldReader::new(&payload, Mode::Create);
        let errors = reader.finish(()).unwrap_err();
        assert!(errors.contains(PAYLOAD_FIELD));
    }

    #[test]
    fn test_required_only_in_create_mode() {
        let payload = json!({});

        let mut reader = FieldReader::new(&payload, Mode::Create);
        assert!(reader.text("title", true).is_none());
        assert_eq!(reader.finish(()).unwrap_err().get("title"), ["is required"]);

        let mut reader = FieldReader::new(&payload, Mode::Update);
        assert!(reader.text("title", true).is_none());
        assert!(reader.finish(()).is_ok());
    }

    #[test]
    fn test_url_rules() {
        let payload = json!({
            "a": "https://cdn.example.com/a.png",
            "b": "ftp://example.com/file",
            "c": "not a url",
            "d": null,
            "e": "",
        });

        let mut reader = FieldReader::new(&payload, Mode::Update);
        assert_eq!(
            reader.url("a"),
            Some(Some("https://cdn.example.com/a.png".to_string()))
        );
        assert_eq!(reader.url("b"), None);
        assert_eq!(reader.url("c"), None);
        assert_eq!(reader.url("d"), Some(None));
        assert_eq!(reader.url("e"), Some(None));
        assert_eq!(reader.url("missing"), None);

        let errors = reader.finish(()).unwrap_err();
        assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["b", "c"]);
    }

    #[test]
    fn test_string_array_reports_each_bad_item() {
        let payload = json!({ "tools": ["rust", 1, true] });
        let mut reader = FieldReader::new(&payload, Mode::Create);
        assert!(reader.string_array("tools", true).is_none());
        assert_eq!(reader.finish(()).unwrap_err().get("tools").len(), 2);
    }
}
