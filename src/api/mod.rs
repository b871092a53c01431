//! HTTP façade: error envelope, router wiring and application context.

pub mod error;

use std::any::Any;
use std::sync::Arc;

use axum::extract::{OriginalUri, State};
use axum::http::Method;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{Value, json};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::models::ApiConfig;

pub use error::{ApiError, ApiResult, ErrorEnvelope};

/// Shared state built once at startup and handed to every handler.
#[derive(Debug, Clone)]
pub struct AppContext {
    pub config: Arc<ApiConfig>,
}

impl AppContext {
    pub fn new(config: ApiConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }
}

/// Wrap application routes with the error handlers, CORS and tracing.
pub fn build_router(routes: Router<AppContext>, ctx: AppContext) -> Router {
    routes
        .fallback(not_found)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(ctx)
}

/// The server's router: a health endpoint plus the shared wiring.
pub fn router(ctx: AppContext) -> Router {
    build_router(Router::new().route("/health", get(health)), ctx)
}

async fn health(State(ctx): State<AppContext>) -> Json<Value> {
    Json(json!({ "status": "ok", "debug": ctx.config.debug }))
}

async fn not_found(method: Method, uri: OriginalUri) -> ApiError {
    tracing::debug!(%method, path = uri.0.path(), "no route matched");
    ApiError::RouteNotFound
}

fn handle_panic(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic payload"
    };
    tracing::error!(panic = detail, "handler panicked");

    ApiError::InternalServerError(error::INTERNAL_FAILURE.to_string()).into_response()
}
