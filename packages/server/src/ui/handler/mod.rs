//! Request handlers.

mod error;
mod extract;
mod http;
mod websocket;

pub use http::{
    create_group, get_group_messages, get_user, health_check, join_group, list_groups,
    list_users, post_group_message, register_user,
};
pub use websocket::websocket_handler;
