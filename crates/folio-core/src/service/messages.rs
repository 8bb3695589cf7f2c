//! Contact form inbox.

use std::sync::Arc;

use serde_json::Value;
use uuid::Uuid;

use crate::auth::{AuthorizationGate, mask_email};
use crate::domain::ContactMessage;
use crate::error::DomainError;
use crate::ports::{MessageRepository, Session};
use crate::validation::validate_message;

pub struct MessageService {
    gate: AuthorizationGate,
    messages: Arc<dyn MessageRepository>,
}

impl MessageService {
    pub fn new(gate: AuthorizationGate, messages: Arc<dyn MessageRepository>) -> Self {
        Self { gate, messages }
    }

    /// Accept a public contact form submission. Markup in the body is stripped.
    pub async fn submit(&self, payload: &Value) -> Result<ContactMessage, DomainError> {
        let input = validate_message(payload)?;
        let message = ContactMessage::new(input.email, input.message);

        let message = self.messages.insert(message).await?;
        tracing::info!(
            message_id = %message.id,
            from = %mask_email(&message.email),
            "Contact message received"
        );
        Ok(message)
    }

    /// Inbox, newest first.
    pub async fn list(&self, session: Option<&Session>) -> Result<Vec<ContactMessage>, DomainError> {
        self.gate.authorize(session)?;
        Ok(self.messages.list().await?)
    }

    pub async fn mark_read(
        &self,
        session: Option<&Session>,
        id: Uuid,
    ) -> Result<ContactMessage, DomainError> {
        self.gate.authorize(session)?;
        self.messages
            .mark_read(id)
            .await
            .map_err(|e| e.for_entity("Message", id))
    }

    pub async fn delete(&self, session: Option<&Session>, id: Uuid) -> Result<(), DomainError> {
        self.gate.authorize(session)?;
        self.messages
            .delete(id)
            .await
            .map_err(|e| e.for_entity("Message", id))?;
        tracing::info!(message_id = %id, "Contact message deleted");
        Ok(())
    }
}
