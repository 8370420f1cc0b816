use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Message {
    pub id: i64,
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
    #[serde(rename = "message")]
    pub content: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

/// Newest message exchanged with one counterpart, plus how many messages
/// from that counterpart the user has not read yet.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct LatestMessage {
    pub counterpart_id: Uuid,
    #[sqlx(flatten)]
    pub message: Message,
    pub unread_count: i64,
}

/// A thread entry, with the display names of both parties.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ThreadMessage {
    pub id: i64,
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
    #[serde(rename = "message")]
    pub content: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
    pub sender_name: Option<String>,
    pub receiver_name: Option<String>,
}

impl ThreadMessage {
    pub fn new(message: Message, sender_name: Option<String>, receiver_name: Option<String>) -> Self {
        Self {
            id: message.id,
            sender_id: message.sender_id,
            receiver_id: message.receiver_id,
            content: message.content,
            is_read: message.is_read,
            created_at: message.created_at,
            sender_name,
            receiver_name,
        }
    }
}
