//! Tsudoi group chat server library.
//!
//! Users join named groups and exchange messages. New messages are pushed to
//! every live WebSocket connection of the group, and each group keeps a
//! bounded in-memory history that seeds late joiners and backs the REST
//! history endpoint.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
