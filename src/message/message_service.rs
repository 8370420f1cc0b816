use std::sync::Arc;

use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::message::{
    conversation::ConversationSummary,
    message_dto::ConversationRow,
    message_models::{Message, ThreadMessage},
    message_repository::MessageStore,
};
use crate::user::UserDirectory;

/// Service layer for direct messages. Every operation takes the caller's
/// identity explicitly.
#[derive(Clone)]
pub struct MessageService {
    repo: Arc<dyn MessageStore>,
    users: Arc<dyn UserDirectory>,
}

impl MessageService {
    pub fn new(repo: Arc<dyn MessageStore>, users: Arc<dyn UserDirectory>) -> Self {
        Self { repo, users }
    }

    #[tracing::instrument(skip(self, content))]
    pub async fn send_message(
        &self,
        sender_id: Uuid,
        receiver_id: Option<Uuid>,
        content: &str,
    ) -> Result<Message> {
        let receiver_id = receiver_id
            .filter(|id| !id.is_nil())
            .ok_or_else(|| AppError::Validation("Receiver and message are required".to_string()))?;

        if content.trim().is_empty() {
            return Err(AppError::Validation("Receiver and message are required".to_string()));
        }

        self.users
            .find_profile(sender_id)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Sender not found".to_string()))?;

        self.users
            .find_profile(receiver_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Receiver not found".to_string()))?;

        let message = self.repo.insert(sender_id, receiver_id, content).await?;
        tracing::info!(message_id = message.id, "Message sent");

        Ok(message)
    }

    /// Returns the thread oldest first, then marks everything the
    /// counterpart sent to the requester as read. The returned rows show
    /// the read flags as they were before marking.
    #[tracing::instrument(skip(self))]
    pub async fn fetch_thread(
        &self,
        requester_id: Uuid,
        counterpart_id: Uuid,
    ) -> Result<Vec<ThreadMessage>> {
        let messages = self.repo.find_thread(requester_id, counterpart_id).await?;

        let marked = self.repo.mark_read(counterpart_id, requester_id).await?;
        if marked > 0 {
            tracing::debug!(marked, "Marked messages as read");
        }

        let profiles = self.users.find_profiles(&[requester_id, counterpart_id]).await?;
        let name_of = |id: Uuid| {
            profiles
                .iter()
                .find(|p| p.id == id)
                .map(|p| p.name.clone())
        };

        Ok(messages
            .into_iter()
            .map(|m| {
                let sender_name = name_of(m.sender_id);
                let receiver_name = name_of(m.receiver_id);
                ThreadMessage::new(m, sender_name, receiver_name)
            })
            .collect())
    }

    #[tracing::instrument(skip(self))]
    pub async fn list_conversations(&self, requester_id: Uuid) -> Result<Vec<ConversationRow>> {
        let heads = self.repo.latest_per_counterpart(requester_id).await?;
        let summary = ConversationSummary::new(requester_id, heads);
        if summary.is_empty() {
            return Ok(Vec::new());
        }

        let profiles = self.users.find_profiles(&summary.counterparts()).await?;
        Ok(summary.into_rows(profiles))
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete_message(&self, requester_id: Uuid, message_id: i64) -> Result<()> {
        if !self.repo.delete_by_id(message_id, requester_id).await? {
            return Err(AppError::NotFound("Message not found".to_string()));
        }

        tracing::info!("Message deleted");
        Ok(())
    }

    pub async fn unread_count(&self, requester_id: Uuid) -> Result<i64> {
        self.repo.count_unread(requester_id).await
    }
}
