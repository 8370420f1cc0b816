//! Conversation list: one row per counterpart, summarized by the latest
//! message exchanged with them, most recent conversation first.
//!
//! The store reduces the requester's messages to one `LatestMessage` per
//! counterpart. This module joins those heads with the counterpart
//! profiles and orders them by the head's timestamp. When two messages of
//! a group share a timestamp either one may be selected (here: the higher id).

use std::collections::HashMap;

use uuid::Uuid;

use super::{message_dto::ConversationRow, message_models::LatestMessage};
use crate::user::UserProfile;

pub struct ConversationSummary {
    user_id: Uuid,
    heads: Vec<LatestMessage>,
}

impl ConversationSummary {
    pub fn new(user_id: Uuid, heads: Vec<LatestMessage>) -> Self {
        Self { user_id, heads }
    }

    pub fn counterparts(&self) -> Vec<Uuid> {
        self.heads.iter().map(|h| h.counterpart_id).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.heads.is_empty()
    }

    /// Joins each head with its counterpart profile. Heads whose
    /// counterpart has no profile are dropped with a warning.
    pub fn into_rows(self, profiles: Vec<UserProfile>) -> Vec<ConversationRow> {
        let user_id = self.user_id;
        let mut profiles: HashMap<Uuid, UserProfile> =
            profiles.into_iter().map(|p| (p.id, p)).collect();

        let mut rows: Vec<ConversationRow> = self
            .heads
            .into_iter()
            .filter_map(|head| {
                let counterpart_id = head.counterpart_id;
                let Some(profile) = profiles.remove(&counterpart_id) else {
                    tracing::warn!(
                        user_id = %user_id,
                        counterpart_id = %counterpart_id,
                        "Counterpart profile missing, omitting conversation"
                    );
                    return None;
                };

                Some(ConversationRow {
                    last_message_id: head.message.id,
                    counterpart_id,
                    counterpart_name: profile.name,
                    counterpart_photo: profile.photo,
                    last_sender_id: head.message.sender_id,
                    last_message: head.message.content,
                    last_message_time: head.message.created_at,
                    is_read: head.message.is_read,
                    unread_count: head.unread_count,
                })
            })
            .collect();

        rows.sort_by(|a, b| {
            b.last_message_time
                .cmp(&a.last_message_time)
                .then(b.last_message_id.cmp(&a.last_message_id))
        });
        rows
    }
}
