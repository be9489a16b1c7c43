use std::any::Any;
use std::path::PathBuf;

use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::error::ChatError;
use crate::handlers;
use crate::prompt::PromptStyle;
use crate::state::AppState;

pub fn create_routes(state: &AppState) -> Router<AppState> {
    let static_dir = PathBuf::from(&state.settings.static_dir);

    let router = Router::new()
        // Chat API
        .route("/api/chat", post(handlers::chat))
        .route("/api/health", get(handlers::health))
        // Landing page
        .route_service("/", ServeFile::new(static_dir.join("index.html")));

    // The text-generation deployment also serves the client's assets by path
    if state.llm.prompt_style() == PromptStyle::Text {
        router.fallback_service(ServeDir::new(static_dir))
    } else {
        router
    }
}

/// Full application: routes, shared state and middleware
pub fn app(state: AppState) -> Router {
    create_routes(&state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
                .layer(CatchPanicLayer::custom(handle_panic)),
        )
        .with_state(state)
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    ChatError::Unexpected(format!("request handler panicked: {}", detail)).into_response()
}
