pub mod routes;
pub mod state;
pub mod view;

use axum::Router;
use axum::routing::{get, post};
use tower_http::services::ServeDir;

use state::AppState;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(routes::dashboard))
        .route("/search", post(routes::search))
        .route("/analyze", post(routes::analyze))
        .nest_service("/static", ServeDir::new("templates/static"))
        .with_state(state)
}
