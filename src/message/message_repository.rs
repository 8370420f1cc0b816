use crate::{
    error::{AppError, Result},
    message::message_models::{LatestMessage, Message},
};
use axum::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

/// Query layer over the `messages` table. Holds no authorization rules
/// beyond the sender check on delete.
#[async_trait]
pub trait MessageStore: Send + Sync {
    async fn insert(&self, sender_id: Uuid, receiver_id: Uuid, content: &str) -> Result<Message>;

    /// Every message between the two users in either direction, oldest first.
    async fn find_thread(&self, user_a: Uuid, user_b: Uuid) -> Result<Vec<Message>>;

    /// One entry per counterpart the user exchanged messages with: the
    /// newest message of that pair (ties resolved by the higher id) and the
    /// count of unread messages from the counterpart. Unordered.
    async fn latest_per_counterpart(&self, user_id: Uuid) -> Result<Vec<LatestMessage>>;

    /// Flags unread messages from `from_user` to `to_user` as read and
    /// returns how many rows changed.
    async fn mark_read(&self, from_user: Uuid, to_user: Uuid) -> Result<u64>;

    async fn delete_by_id(&self, message_id: i64, requester_id: Uuid) -> Result<bool>;

    async fn count_unread(&self, user_id: Uuid) -> Result<i64>;
}

pub(crate) fn check_insert(receiver_id: Uuid, content: &str) -> Result<()> {
    if receiver_id.is_nil() {
        return Err(AppError::Validation("Receiver is required".to_string()));
    }
    if content.is_empty() {
        return Err(AppError::Validation("Message is required".to_string()));
    }
    Ok(())
}

#[derive(Clone)]
pub struct MessageRepository {
    pool: PgPool,
}

impl MessageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MessageStore for MessageRepository {
    async fn insert(&self, sender_id: Uuid, receiver_id: Uuid, content: &str) -> Result<Message> {
        check_insert(receiver_id, content)?;

        let message = sqlx::query_as::<_, Message>(
            "INSERT INTO messages (sender_id, receiver_id, content)
             VALUES ($1, $2, $3)
             RETURNING id, sender_id, receiver_id, content, is_read, created_at",
        )
        .bind(sender_id)
        .bind(receiver_id)
        .bind(content)
        .fetch_one(&self.pool)
        .await?;

        Ok(message)
    }

    async fn find_thread(&self, user_a: Uuid, user_b: Uuid) -> Result<Vec<Message>> {
        let messages = sqlx::query_as::<_, Message>(
            "SELECT id, sender_id, receiver_id, content, is_read, created_at
             FROM messages
             WHERE (sender_id = $1 AND receiver_id = $2)
                OR (sender_id = $2 AND receiver_id = $1)
             ORDER BY created_at ASC, id ASC",
        )
        .bind(user_a)
        .bind(user_b)
        .fetch_all(&self.pool)
        .await?;

        Ok(messages)
    }

    async fn latest_per_counterpart(&self, user_id: Uuid) -> Result<Vec<LatestMessage>> {
        let heads = sqlx::query_as::<_, LatestMessage>(
            "WITH involved AS (
                SELECT
                    CASE
                        WHEN sender_id = $1 THEN receiver_id
                        ELSE sender_id
                    END AS counterpart_id,
                    id, sender_id, receiver_id, content, is_read, created_at
                FROM messages
                WHERE sender_id = $1 OR receiver_id = $1
            ),
            latest AS (
                SELECT DISTINCT ON (counterpart_id) *
                FROM involved
                ORDER BY counterpart_id, created_at DESC, id DESC
            ),
            unread_counts AS (
                SELECT sender_id AS counterpart_id, COUNT(*) AS unread_count
                FROM messages
                WHERE receiver_id = $1 AND is_read = false
                GROUP BY sender_id
            )
            SELECT
                l.counterpart_id,
                l.id, l.sender_id, l.receiver_id, l.content, l.is_read, l.created_at,
                COALESCE(uc.unread_count, 0) AS unread_count
            FROM latest l
            LEFT JOIN unread_counts uc ON uc.counterpart_id = l.counterpart_id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(heads)
    }

    async fn mark_read(&self, from_user: Uuid, to_user: Uuid) -> Result<u64> {
        let result = sqlx::query(
            "UPDATE messages
             SET is_read = true
             WHERE sender_id = $1 AND receiver_id = $2 AND is_read = false",
        )
        .bind(from_user)
        .bind(to_user)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn delete_by_id(&self, message_id: i64, requester_id: Uuid) -> Result<bool> {
        let sender_id: Option<Uuid> =
            sqlx::query_scalar("SELECT sender_id FROM messages WHERE id = $1")
                .bind(message_id)
                .fetch_optional(&self.pool)
                .await?;

        match sender_id {
            None => return Err(AppError::NotFound("Message not found".to_string())),
            Some(sender_id) if sender_id != requester_id => {
                return Err(AppError::Forbidden("Not authorized".to_string()))
            }
            Some(_) => {}
        }

        let result = sqlx::query("DELETE FROM messages WHERE id = $1 AND sender_id = $2")
            .bind(message_id)
            .bind(requester_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn count_unread(&self, user_id: Uuid) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM messages
             WHERE receiver_id = $1 AND is_read = false",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }
}
