//! Real-time group messaging
//!
//! - `registry`: which live connections are attached to which group
//! - `channel`: bounded history and fan-out of published messages
//! - `session`: attachment guard handed to the transport layer

pub mod channel;
pub mod registry;
pub mod session;

pub use channel::GroupChannel;
pub use registry::ConnectionRegistry;
pub use session::LiveSession;
