use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::message_models::Message;

/// Body of `POST /api/messages`. `receiver_id` is accepted as an alias of `receiverId`.
#[derive(Clone, Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    #[serde(alias = "receiver_id")]
    #[validate(required(message = "Receiver and message are required"))]
    pub receiver_id: Option<Uuid>,
    #[validate(
        required(message = "Receiver and message are required"),
        length(max = 5000, message = "Message must be at most 5000 characters")
    )]
    pub message: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageResponse {
    pub message: String,
    pub message_id: i64,
    pub data: Message,
}

impl From<Message> for SendMessageResponse {
    fn from(message: Message) -> Self {
        Self {
            message: "Message sent successfully".to_string(),
            message_id: message.id,
            data: message,
        }
    }
}

/// One row of the conversation list: a thread summarized by its latest message.
///
/// Serialized with the field names the mobile client reads (`id`,
/// `other_user_*`, `message`, `created_at`).
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ConversationRow {
    #[serde(rename = "id")]
    pub last_message_id: i64,
    #[serde(rename = "other_user_id")]
    pub counterpart_id: Uuid,
    #[serde(rename = "other_user_name")]
    pub counterpart_name: String,
    #[serde(rename = "other_user_photo")]
    pub counterpart_photo: Option<String>,
    #[serde(rename = "sender_id")]
    pub last_sender_id: Uuid,
    #[serde(rename = "message")]
    pub last_message: String,
    #[serde(rename = "created_at")]
    pub last_message_time: DateTime<Utc>,
    pub is_read: bool,
    pub unread_count: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UnreadCountResponse {
    pub count: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AckResponse {
    pub message: String,
}
