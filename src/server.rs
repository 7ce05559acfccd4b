//! HTTP server and routes.

mod handlers;
mod state;

pub use state::AppState;

use axum::{
    Router,
    routing::{delete, get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Create the application router.
///
/// Loose files are served through the single `/files/{library}/{*path}`
/// route, resolved against the catalog per request; nothing is mounted
/// or unmounted as libraries come and go.
pub fn create_router(state: AppState) -> Router {
    let library_routes = Router::new()
        .route(
            "/",
            get(handlers::list_libraries).post(handlers::create_library),
        )
        .route("/{id}", delete(handlers::delete_library))
        .route("/{id}/scan", post(handlers::scan_library))
        .route("/{id}/check", get(handlers::check_library));

    let node_routes = Router::new()
        .route("/", get(handlers::nodes_overview))
        .route("/{id}", get(handlers::node_contents))
        .route("/{id}/image/{*entry}", get(handlers::node_image))
        .route("/{id}/subfolder/{*path}", get(handlers::resolve_subfolder));

    Router::new()
        .route("/", get(handlers::index))
        .route(
            "/static/default-thumbnail.png",
            get(handlers::default_thumbnail),
        )
        .route("/files/{library}/{*path}", get(handlers::library_file))
        .nest("/api/libraries", library_routes)
        .nest("/api/nodes", node_routes)
        .route("/api/stats", get(handlers::api_stats))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
