//! WebSocket message DTOs.

use serde::{Deserialize, Serialize};

/// Stored message as seen by clients (REST responses and live frames).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageDto {
    pub id: String,
    pub group_id: String,
    pub user_id: String,
    pub user_name: String,
    pub message: String,
    /// RFC 3339, UTC
    pub timestamp: String,
}

/// Server → client frame.
///
/// `history` is sent exactly once per connection, before any `message`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum LiveUpdateDto {
    History { messages: Vec<MessageDto> },
    Message { data: MessageDto },
    Error { detail: String },
}

/// Client → server frame.
///
/// Sender identity comes from the session; any `user_id` / `user_name`
/// fields a client includes are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundChatDto {
    pub message: String,
}
