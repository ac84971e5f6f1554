//! Messaging request and response types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::models::{Listing, Message, User};

/// Body of `POST /api/messages`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    pub receiver_id: Uuid,
    #[serde(default)]
    pub listing_id: Option<Uuid>,
    pub content: String,
}

/// Participant fields shown on messages and conversations
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_picture: Option<String>,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            profile_picture: user.profile_picture.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListingSummary {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub title: String,
}

impl From<&Listing> for ListingSummary {
    fn from(listing: &Listing) -> Self {
        Self {
            id: listing.id,
            title: listing.title.clone(),
        }
    }
}

/// A message with participants and listing resolved
///
/// A participant whose record is gone renders as null, as does a listing
/// reference that no longer resolves.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageView {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub sender: Option<UserSummary>,
    pub receiver: Option<UserSummary>,
    pub listing: Option<ListingSummary>,
    pub content: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MessageView {
    pub fn new(
        message: Message,
        sender: Option<UserSummary>,
        receiver: Option<UserSummary>,
        listing: Option<ListingSummary>,
    ) -> Self {
        Self {
            id: message.id,
            sender,
            receiver,
            listing,
            content: message.content,
            read: message.read,
            created_at: message.created_at,
            updated_at: message.updated_at,
        }
    }
}

/// Preview of the newest message in a conversation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LastMessage {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub read: bool,
    pub listing: Option<Uuid>,
}

impl From<Message> for LastMessage {
    fn from(message: Message) -> Self {
        Self {
            id: message.id,
            content: message.content,
            created_at: message.created_at,
            read: message.read,
            listing: message.listing,
        }
    }
}

/// One entry per counterpart; `_id` is the counterpart's user id
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationView {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub user: UserSummary,
    pub last_message: LastMessage,
}

#[derive(Debug, Serialize)]
pub struct SendMessageResponse {
    pub message: &'static str,
    pub data: MessageView,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationsPage {
    pub conversations: Vec<ConversationView>,
    pub current_page: u32,
    pub total_pages: u64,
    pub total_conversations: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessagesPage {
    pub messages: Vec<MessageView>,
    pub current_page: u32,
    pub total_pages: u64,
    pub total_messages: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnreadCount {
    pub unread_count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_send_request_listing_optional() {
        let receiver = Uuid::now_v7();
        let request: SendMessageRequest =
            serde_json::from_value(json!({"receiverId": receiver, "content": "hi"})).unwrap();
        assert_eq!(request.receiver_id, receiver);
        assert_eq!(request.listing_id, None);
    }

    #[test]
    fn test_unread_count_shape() {
        let body = serde_json::to_value(UnreadCount { unread_count: 3 }).unwrap();
        assert_eq!(body, json!({"unreadCount": 3}));
    }
}
