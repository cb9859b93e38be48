//! Conversion logic between DTOs and domain entities.

use tsudoi_shared::time::timestamp_to_rfc3339;

use crate::domain::{ChatMessage, Group, LiveUpdate, User};
use crate::infrastructure::dto::{
    http::{GroupDto, UserDto},
    websocket::{LiveUpdateDto, MessageDto},
};

// ========================================
// Domain Entity → DTO
// ========================================

impl From<&ChatMessage> for MessageDto {
    fn from(model: &ChatMessage) -> Self {
        Self {
            id: model.id().to_string(),
            group_id: model.group_id().to_string(),
            user_id: model.user_id().to_string(),
            user_name: model.user_name().to_string(),
            message: model.text().as_str().to_string(),
            timestamp: timestamp_to_rfc3339(model.timestamp().value()),
        }
    }
}

impl From<ChatMessage> for MessageDto {
    fn from(model: ChatMessage) -> Self {
        Self::from(&model)
    }
}

impl From<LiveUpdate> for LiveUpdateDto {
    fn from(update: LiveUpdate) -> Self {
        match update {
            LiveUpdate::History(messages) => Self::History {
                messages: messages.iter().map(MessageDto::from).collect(),
            },
            LiveUpdate::Message(message) => Self::Message {
                data: MessageDto::from(&message),
            },
            LiveUpdate::Rejected(detail) => Self::Error { detail },
        }
    }
}

impl From<User> for UserDto {
    fn from(model: User) -> Self {
        Self {
            id: model.id.into_string(),
            name: model.name,
            email: model.email,
        }
    }
}

impl From<Group> for GroupDto {
    fn from(model: Group) -> Self {
        Self {
            id: model.id.into_string(),
            name: model.name,
            description: model.description,
            admin_id: model.admin_id.into_string(),
            members: model.members.into_iter().map(|m| m.into_string()).collect(),
            max_members: model.max_members,
        }
    }
}
