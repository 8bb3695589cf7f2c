//! Standardized API envelopes.
//!
//! Errors are `{ "error": <message | { field: [messages] }> }`, which is what
//! the site's forms render inline.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Acknowledgement for operations that return no entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    pub fn ok_with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: Some(message.into()),
        }
    }
}

impl ApiResponse<()> {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: None,
            message: Some(message.into()),
        }
    }
}

/// Either a single message or per-field validation messages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ErrorDetail {
    Message(String),
    Fields(BTreeMap<String, Vec<String>>),
}

/// Error body returned with every non-2xx response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub error: ErrorDetail,

    /// Request ID for debugging purposes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: ErrorDetail::Message(message.into()),
            request_id: None,
        }
    }

    pub fn fields(fields: BTreeMap<String, Vec<String>>) -> Self {
        Self {
            error: ErrorDetail::Fields(fields),
            request_id: None,
        }
    }

    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    // Common error constructors
    pub fn unauthorized() -> Self {
        Self::new("Unauthorized")
    }

    pub fn forbidden() -> Self {
        Self::new("Forbidden")
    }

    pub fn not_found(detail: impl Into<String>) -> Self {
        Self::new(detail)
    }

    pub fn too_many_requests() -> Self {
        Self::new("Too many requests")
    }

    pub fn internal_error() -> Self {
        Self::new("Internal Server Error")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_message_error_shape() {
        let body = serde_json::to_value(ErrorResponse::forbidden()).unwrap();
        assert_eq!(body, json!({ "error": "Forbidden" }));
    }

    #[test]
    fn test_field_error_shape() {
        let mut fields = BTreeMap::new();
        fields.insert("tags".to_string(), vec!["at most 10 tags are allowed".to_string()]);
        let body = serde_json::to_value(ErrorResponse::fields(fields).with_request_id("r-1")).unwrap();
        assert_eq!(
            body,
            json!({
                "error": { "tags": ["at most 10 tags are allowed"] },
                "requestId": "r-1",
            })
        );
    }

    #[test]
    fn test_acknowledgement_shape() {
        let body = serde_json::to_value(ApiResponse::message("Message deleted")).unwrap();
        assert_eq!(body, json!({ "success": true, "message": "Message deleted" }));
    }
}
