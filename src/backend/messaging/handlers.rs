//! Messaging HTTP Handlers
//!
//! Direct messages between two users. Every handler runs behind
//! `auth_middleware` and acts on behalf of the caller.

use std::collections::HashMap;

use axum::{extract::State, http::StatusCode, Json};
use uuid::Uuid;

use crate::backend::error::ApiError;
use crate::backend::extract::{ApiJson, ApiPath, ApiQuery};
use crate::backend::messaging::types::{
    ConversationView, ConversationsPage, ListingSummary, MessageView, MessagesPage,
    SendMessageRequest, SendMessageResponse, UnreadCount, UserSummary,
};
use crate::backend::middleware::AuthUser;
use crate::backend::server::state::AppState;
use crate::shared::models::{Message, NewMessage};
use crate::shared::pagination::PaginationParams;

pub const DEFAULT_CONVERSATIONS_PAGE_SIZE: u32 = 20;
pub const DEFAULT_MESSAGES_PAGE_SIZE: u32 = 50;

/// Resolve participants and listings for a batch of messages
async fn populate_messages(
    app_state: &AppState,
    messages: Vec<Message>,
) -> Result<Vec<MessageView>, ApiError> {
    let mut user_ids: Vec<Uuid> = messages
        .iter()
        .flat_map(|message| [message.sender, message.receiver])
        .collect();
    user_ids.sort_unstable();
    user_ids.dedup();

    let mut listing_ids: Vec<Uuid> = messages.iter().filter_map(|m| m.listing).collect();
    listing_ids.sort_unstable();
    listing_ids.dedup();

    let users: HashMap<Uuid, UserSummary> = app_state
        .store
        .find_users_by_ids(&user_ids)
        .await?
        .iter()
        .map(|user| (user.id, UserSummary::from(user)))
        .collect();

    let listings: HashMap<Uuid, ListingSummary> = if listing_ids.is_empty() {
        HashMap::new()
    } else {
        app_state
            .store
            .find_listings_by_ids(&listing_ids)
            .await?
            .iter()
            .map(|listing| (listing.id, ListingSummary::from(listing)))
            .collect()
    };

    Ok(messages
        .into_iter()
        .map(|message| {
            let sender = users.get(&message.sender).cloned();
            let receiver = users.get(&message.receiver).cloned();
            let listing = message.listing.and_then(|id| listings.get(&id).cloned());
            MessageView::new(message, sender, receiver, listing)
        })
        .collect())
}

/// Send a message
///
/// # Errors
///
/// * `400 Bad Request` - Blank content
/// * `404 Not Found` - Receiver does not exist; nothing is stored
pub async fn send_message(
    State(app_state): State<AppState>,
    AuthUser(auth): AuthUser,
    ApiJson(request): ApiJson<SendMessageRequest>,
) -> Result<(StatusCode, Json<SendMessageResponse>), ApiError> {
    if app_state
        .store
        .find_user_by_id(request.receiver_id)
        .await?
        .is_none()
    {
        tracing::warn!(receiver = %request.receiver_id, "Message to unknown receiver");
        return Err(ApiError::NotFound("Receiver"));
    }

    let new_message = NewMessage::new(
        auth.user_id,
        request.receiver_id,
        request.listing_id,
        &request.content,
    )?;
    let message = app_state.store.insert_message(new_message).await?;

    tracing::info!(
        message_id = %message.id,
        sender = %message.sender,
        receiver = %message.receiver,
        "Message sent"
    );

    let data = populate_messages(&app_state, vec![message])
        .await?
        .pop()
        .ok_or_else(|| ApiError::internal("sent message missing from populated batch"))?;

    Ok((
        StatusCode::CREATED,
        Json(SendMessageResponse {
            message: "Message sent successfully",
            data,
        }),
    ))
}

/// List the caller's conversations, most recent first
pub async fn get_conversations(
    State(app_state): State<AppState>,
    AuthUser(auth): AuthUser,
    ApiQuery(params): ApiQuery<PaginationParams>,
) -> Result<Json<ConversationsPage>, ApiError> {
    let request = params.resolve(DEFAULT_CONVERSATIONS_PAGE_SIZE)?;
    let page = app_state
        .store
        .conversations_for(auth.user_id, request)
        .await?;

    let counterpart_ids: Vec<Uuid> = page.items.iter().map(|c| c.counterpart).collect();
    let users: HashMap<Uuid, UserSummary> = app_state
        .store
        .find_users_by_ids(&counterpart_ids)
        .await?
        .iter()
        .map(|user| (user.id, UserSummary::from(user)))
        .collect();

    let conversations = page
        .items
        .into_iter()
        .filter_map(|conversation| {
            let user = users.get(&conversation.counterpart)?.clone();
            Some(ConversationView {
                id: conversation.counterpart,
                user,
                last_message: conversation.last_message.into(),
            })
        })
        .collect();

    Ok(Json(ConversationsPage {
        conversations,
        current_page: request.page(),
        total_pages: request.total_pages(page.total),
        total_conversations: page.total,
    }))
}

/// Fetch the conversation with one user and mark their messages to the caller as read
///
/// The page is selected newest first and returned oldest first. Read flags
/// in the response are as they were before this call.
pub async fn get_messages(
    State(app_state): State<AppState>,
    AuthUser(auth): AuthUser,
    ApiPath(other): ApiPath<Uuid>,
    ApiQuery(params): ApiQuery<PaginationParams>,
) -> Result<Json<MessagesPage>, ApiError> {
    let request = params.resolve(DEFAULT_MESSAGES_PAGE_SIZE)?;
    let page = app_state
        .store
        .messages_between(auth.user_id, other, request)
        .await?;

    let marked = app_state.store.mark_read(other, auth.user_id).await?;
    if marked > 0 {
        tracing::debug!(reader = %auth.user_id, sender = %other, marked, "Messages marked read");
    }

    let mut messages = populate_messages(&app_state, page.items).await?;
    messages.reverse();

    Ok(Json(MessagesPage {
        messages,
        current_page: request.page(),
        total_pages: request.total_pages(page.total),
        total_messages: page.total,
    }))
}

/// Count of unread messages addressed to the caller
pub async fn get_unread_count(
    State(app_state): State<AppState>,
    AuthUser(auth): AuthUser,
) -> Result<Json<UnreadCount>, ApiError> {
    let unread_count = app_state.store.unread_count(auth.user_id).await?;
    Ok(Json(UnreadCount { unread_count }))
}
