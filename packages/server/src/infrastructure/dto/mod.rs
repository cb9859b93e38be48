//! Data Transfer Objects (DTOs) for the group chat server.
//!
//! DTOs are organized by protocol:
//! - `websocket`: live channel frames and the shared message shape
//! - `http`: REST request/response bodies
//! - `conversion`: domain ↔ DTO conversions

pub mod conversion;
pub mod http;
pub mod websocket;
