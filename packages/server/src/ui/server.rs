//! Server execution logic.

use std::{future::Future, sync::Arc};

use axum::{
    Router,
    routing::{get, post},
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use super::{
    cors::build_cors_layer,
    handler::{
        create_group, get_group_messages, get_user, health_check, join_group, list_groups,
        list_users, post_group_message, register_user, websocket_handler,
    },
    signal::shutdown_signal,
    state::AppState,
};

/// Group chat server
///
/// # Example
///
/// ```ignore
/// let server = Server::new(AppState::new(directory, channel));
/// server.run("127.0.0.1".to_string(), 8080).await?;
/// ```
pub struct Server {
    state: Arc<AppState>,
}

impl Server {
    pub fn new(state: AppState) -> Self {
        Self {
            state: Arc::new(state),
        }
    }

    /// Build the router with every REST and WebSocket route.
    pub fn router(&self) -> Router {
        Router::new()
            // WebSocket エンドポイント
            .route("/api/v1/ws/groups/{group_id}", get(websocket_handler))
            // HTTP エンドポイント
            .route("/api/health", get(health_check))
            .route("/api/v1/users", get(list_users).post(register_user))
            .route("/api/v1/users/{user_id}", get(get_user))
            .route("/api/v1/groups", get(list_groups).post(create_group))
            .route("/api/v1/groups/{group_id}/join", post(join_group))
            .route(
                "/api/v1/groups/{group_id}/messages",
                get(get_group_messages).post(post_group_message),
            )
            .layer(build_cors_layer())
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Run the group chat server until Ctrl+C / SIGTERM.
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address or
    /// if there's an error during server execution.
    pub async fn run(self, host: String, port: u16) -> Result<(), Box<dyn std::error::Error>> {
        let bind_addr = format!("{}:{}", host, port);
        let listener = TcpListener::bind(&bind_addr).await?;

        tracing::info!("Group chat server listening on {}", listener.local_addr()?);
        tracing::info!(
            "Connect to: ws://{}/api/v1/ws/groups/{{group_id}}?user_id={{user_id}}",
            bind_addr
        );
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        self.serve(listener, shutdown_signal()).await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }

    /// Serve on an already bound listener until `shutdown` resolves.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await
    }
}
