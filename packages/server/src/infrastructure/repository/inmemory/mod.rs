//! In-memory directory, held for the lifetime of the process.

pub mod directory;

pub use directory::InMemoryDirectory;
