use axum::http::Method;
use tower_http::cors::{Any, CorsLayer};

/// Cross-origin policy for public endpoints: any origin may call.
pub fn allow_any_origin() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
}
