// HTTP routes for the query surface

mod http;

use axum::{Router, routing::get};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::event_repo::EventRepo;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) repo: Arc<EventRepo>,
}

pub fn app(repo: Arc<EventRepo>) -> Router {
    let state = AppState { repo };
    Router::new()
        .route("/hourly", get(http::hourly_handler)) // GET /hourly
        .route("/version", get(http::version_handler)) // GET /version
        .layer(CorsLayer::new().allow_origin(Any))
        .with_state(state)
}
