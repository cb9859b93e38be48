//! UI layer: axum router, handlers and server lifecycle.

mod cors;
mod handler;
mod server;
mod signal;
mod state;

pub use server::Server;
pub use signal::shutdown_signal;
pub use state::AppState;
