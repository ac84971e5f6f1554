//! Direct Messages

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::shared::error::{require_non_blank, SharedError};

/// A stored direct message
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub sender: Uuid,
    pub receiver: Uuid,
    /// Listing the message is about, if any
    pub listing: Option<Uuid>,
    pub content: String,
    /// Flipped to true once the receiver opens the conversation
    pub read: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Message {
    /// The participant on the other side from `user_id`
    pub fn counterpart_of(&self, user_id: Uuid) -> Uuid {
        if self.sender == user_id {
            self.receiver
        } else {
            self.sender
        }
    }

    /// True when the message was exchanged between `a` and `b`, either way
    pub fn is_between(&self, a: Uuid, b: Uuid) -> bool {
        (self.sender == a && self.receiver == b) || (self.sender == b && self.receiver == a)
    }
}

/// A message ready to be stored
#[derive(Debug, Clone, PartialEq)]
pub struct NewMessage {
    pub sender: Uuid,
    pub receiver: Uuid,
    pub listing: Option<Uuid>,
    pub content: String,
}

impl NewMessage {
    /// Build a message, trimming the content and rejecting it when empty
    pub fn new(
        sender: Uuid,
        receiver: Uuid,
        listing: Option<Uuid>,
        content: &str,
    ) -> Result<Self, SharedError> {
        require_non_blank("content", content)?;
        Ok(Self {
            sender,
            receiver,
            listing,
            content: content.trim().to_string(),
        })
    }
}
