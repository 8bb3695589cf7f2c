use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Message left through the public contact form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactMessage {
    pub id: Uuid,
    pub email: String,
    pub message: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

impl ContactMessage {
    pub fn new(email: String, message: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            email,
            message,
            read: false,
            created_at: Utc::now(),
        }
    }
}
