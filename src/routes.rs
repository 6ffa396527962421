//! Route configuration.

use std::any::Any;

use axum::body::Bytes;
use axum::http::{header, HeaderValue, Response, StatusCode};
use axum::Router;
use http_body_util::Full;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;

use crate::errors::MSG_GENERIC_ERROR;
use crate::handlers::user_routes;
use crate::state::AppState;

/// Create the main router with all routes.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/users", user_routes())
        .layer(CorsLayer::permissive())
        .layer(CatchPanicLayer::custom(handle_panic))
        .with_state(state)
}

/// Last-resort fallback: a panicking handler still produces the generic 500
/// body instead of tearing down the connection.
fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response<Full<Bytes>> {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        (*s).to_string()
    } else {
        "unknown panic".to_string()
    };
    tracing::error!("request handler panicked: {}", detail);

    let body = serde_json::json!({ "error": MSG_GENERIC_ERROR }).to_string();
    Response::builder()
        .status(StatusCode::INTERNAL_SERVER_ERROR)
        .header(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        )
        .body(Full::from(body))
        .expect("panic response is well-formed")
}
