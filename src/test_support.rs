//! In-memory stores used by unit and router tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    error::{AppError, Result},
    message::{
        message_models::{LatestMessage, Message},
        message_repository::{check_insert, MessageStore},
        message_service::MessageService,
    },
    state::{AppState, Config},
    user::{UserDirectory, UserProfile},
};

pub const TEST_JWT_SECRET: &str = "test-secret";

#[derive(Default)]
struct MessageTable {
    rows: Vec<Message>,
    next_id: i64,
    last_created_at: Option<DateTime<Utc>>,
}

/// Assigns ids and timestamps like the database does; timestamps are kept
/// strictly increasing so insertion order is observable.
#[derive(Default)]
pub struct MemoryMessageStore {
    table: Mutex<MessageTable>,
}

impl MemoryMessageStore {
    pub fn insert_at(
        &self,
        sender_id: Uuid,
        receiver_id: Uuid,
        content: &str,
        created_at: DateTime<Utc>,
    ) -> Message {
        let mut table = self.table.lock().unwrap();
        table.next_id += 1;
        let message = Message {
            id: table.next_id,
            sender_id,
            receiver_id,
            content: content.to_string(),
            is_read: false,
            created_at,
        };
        table.rows.push(message.clone());
        message
    }

    pub fn get(&self, message_id: i64) -> Option<Message> {
        let table = self.table.lock().unwrap();
        table.rows.iter().find(|m| m.id == message_id).cloned()
    }

    pub fn snapshot(&self) -> Vec<Message> {
        self.table.lock().unwrap().rows.clone()
    }

    fn now(&self) -> DateTime<Utc> {
        let mut table = self.table.lock().unwrap();
        let now = match table.last_created_at {
            Some(last) if Utc::now() <= last => last + chrono::Duration::microseconds(1),
            _ => Utc::now(),
        };
        table.last_created_at = Some(now);
        now
    }
}

#[async_trait]
impl MessageStore for MemoryMessageStore {
    async fn insert(&self, sender_id: Uuid, receiver_id: Uuid, content: &str) -> Result<Message> {
        check_insert(receiver_id, content)?;
        let created_at = self.now();
        Ok(self.insert_at(sender_id, receiver_id, content, created_at))
    }

    async fn find_thread(&self, user_a: Uuid, user_b: Uuid) -> Result<Vec<Message>> {
        let mut thread: Vec<Message> = self
            .snapshot()
            .into_iter()
            .filter(|m| {
                (m.sender_id == user_a && m.receiver_id == user_b)
                    || (m.sender_id == user_b && m.receiver_id == user_a)
            })
            .collect();
        thread.sort_by_key(|m| (m.created_at, m.id));
        Ok(thread)
    }

    async fn latest_per_counterpart(&self, user_id: Uuid) -> Result<Vec<LatestMessage>> {
        let mut heads: HashMap<Uuid, LatestMessage> = HashMap::new();

        for message in self
            .snapshot()
            .into_iter()
            .filter(|m| m.sender_id == user_id || m.receiver_id == user_id)
        {
            let counterpart_id = if message.sender_id == user_id {
                message.receiver_id
            } else {
                message.sender_id
            };
            let unread = i64::from(message.receiver_id == user_id && !message.is_read);

            match heads.get_mut(&counterpart_id) {
                Some(head) => {
                    head.unread_count += unread;
                    if (message.created_at, message.id) > (head.message.created_at, head.message.id) {
                        head.message = message;
                    }
                }
                None => {
                    heads.insert(
                        counterpart_id,
                        LatestMessage {
                            counterpart_id,
                            message,
                            unread_count: unread,
                        },
                    );
                }
            }
        }

        Ok(heads.into_values().collect())
    }

    async fn mark_read(&self, from_user: Uuid, to_user: Uuid) -> Result<u64> {
        let mut table = self.table.lock().unwrap();
        let mut changed = 0;
        for m in table
            .rows
            .iter_mut()
            .filter(|m| m.sender_id == from_user && m.receiver_id == to_user && !m.is_read)
        {
            m.is_read = true;
            changed += 1;
        }
        Ok(changed)
    }

    async fn delete_by_id(&self, message_id: i64, requester_id: Uuid) -> Result<bool> {
        let mut table = self.table.lock().unwrap();
        let position = table
            .rows
            .iter()
            .position(|m| m.id == message_id)
            .ok_or_else(|| AppError::NotFound("Message not found".to_string()))?;

        if table.rows[position].sender_id != requester_id {
            return Err(AppError::Forbidden("Not authorized".to_string()));
        }

        table.rows.remove(position);
        Ok(true)
    }

    async fn count_unread(&self, user_id: Uuid) -> Result<i64> {
        Ok(self
            .snapshot()
            .iter()
            .filter(|m| m.receiver_id == user_id && !m.is_read)
            .count() as i64)
    }
}

#[derive(Default)]
pub struct MemoryUserDirectory {
    users: Mutex<HashMap<Uuid, UserProfile>>,
}

impl MemoryUserDirectory {
    pub fn add(&self, name: &str, photo: Option<&str>) -> Uuid {
        let id = Uuid::new_v4();
        self.users.lock().unwrap().insert(
            id,
            UserProfile {
                id,
                name: name.to_string(),
                photo: photo.map(str::to_string),
            },
        );
        id
    }

    pub fn remove(&self, user_id: Uuid) {
        self.users.lock().unwrap().remove(&user_id);
    }
}

#[async_trait]
impl UserDirectory for MemoryUserDirectory {
    async fn find_profile(&self, user_id: Uuid) -> Result<Option<UserProfile>> {
        Ok(self.users.lock().unwrap().get(&user_id).cloned())
    }

    async fn find_profiles(&self, user_ids: &[Uuid]) -> Result<Vec<UserProfile>> {
        let users = self.users.lock().unwrap();
        Ok(user_ids.iter().filter_map(|id| users.get(id).cloned()).collect())
    }
}

pub fn test_config() -> Config {
    Config {
        database_url: "postgres://localhost/unused".to_string(),
        jwt_secret: TEST_JWT_SECRET.to_string(),
        host: "127.0.0.1".to_string(),
        port: 0,
        db_max_connections: 1,
        db_acquire_timeout: Duration::from_secs(1),
    }
}

pub fn test_state() -> (AppState, Arc<MemoryUserDirectory>, Arc<MemoryMessageStore>) {
    let users = Arc::new(MemoryUserDirectory::default());
    let store = Arc::new(MemoryMessageStore::default());
    let state = AppState {
        config: Arc::new(test_config()),
        message_service: MessageService::new(store.clone(), users.clone()),
    };
    (state, users, store)
}

/// Seeds a `users` row for tests running against Postgres.
pub async fn insert_user(pool: &PgPool, name: &str, photo: Option<&str>) -> Uuid {
    sqlx::query_scalar("INSERT INTO users (name, email, photo) VALUES ($1, $2, $3) RETURNING id")
        .bind(name)
        .bind(format!("{}-{}@example.com", name.to_lowercase(), Uuid::new_v4()))
        .bind(photo)
        .fetch_one(pool)
        .await
        .unwrap()
}

/// Seeds a `messages` row with an explicit timestamp.
pub async fn insert_message_at(
    pool: &PgPool,
    sender_id: Uuid,
    receiver_id: Uuid,
    content: &str,
    created_at: DateTime<Utc>,
) -> Message {
    sqlx::query_as::<_, Message>(
        "INSERT INTO messages (sender_id, receiver_id, content, created_at)
         VALUES ($1, $2, $3, $4)
         RETURNING id, sender_id, receiver_id, content, is_read, created_at",
    )
    .bind(sender_id)
    .bind(receiver_id)
    .bind(content)
    .bind(created_at)
    .fetch_one(pool)
    .await
    .unwrap()
}
