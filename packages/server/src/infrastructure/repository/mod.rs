//! Directory implementations.

pub mod inmemory;

pub use inmemory::InMemoryDirectory;
