//! Infrastructure layer
//!
//! Concrete implementations behind the domain layer: the live connection
//! registry and group channel, the in-memory directory and the wire DTOs.

pub mod dto;
pub mod live;
pub mod repository;
