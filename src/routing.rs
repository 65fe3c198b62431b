//! Application router configuration.

use std::path::Path;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::services::ServeDir;

use crate::{
    AppState, endpoints,
    not_found::get_404_not_found,
    widget::{add_funds_endpoint, get_widget_page, subtract_funds_endpoint},
};

/// Return a router with all the app's routes.
///
/// Static files are served from `static_dir`.
pub fn build_router(state: AppState, static_dir: &Path) -> Router {
    Router::new()
        .route(endpoints::ROOT, get(get_widget_page))
        .route(endpoints::ADD_FUNDS_API, post(add_funds_endpoint))
        .route(endpoints::SUBTRACT_FUNDS_API, post(subtract_funds_endpoint))
        .nest_service(endpoints::STATIC, ServeDir::new(static_dir))
        .fallback(get_404_not_found)
        .with_state(state)
}
