//! CORS layer configuration.

use tower_http::cors::{Any, CorsLayer};

/// Any origin, method and header. The browser client is served from a
/// different origin and sends `X-User-ID` on writes.
pub fn build_cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}
