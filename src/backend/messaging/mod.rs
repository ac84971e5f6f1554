//! Messaging Module
//!
//! Direct messages between users, the per-counterpart conversation list
//! and unread counts.

pub mod handlers;
pub mod types;

pub use handlers::{get_conversations, get_messages, get_unread_count, send_message};
