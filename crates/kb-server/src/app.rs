//! Router construction.
//!
//! Builds the axum router with all routes and middleware.

use std::sync::Arc;

use axum::Router;
use axum::response::Redirect;
use axum::routing::get;
use tower::ServiceBuilder;

use crate::handlers;
use crate::middleware::security;
use crate::state::AppState;
use crate::static_files;

/// Create the application router.
///
/// Document pages are mounted under the configured base path.
pub(crate) fn create_router(state: Arc<AppState>) -> Router {
    let api_routes = Router::new()
        .route("/api/navigation", get(handlers::navigation::get_navigation))
        .route("/api/docs", get(handlers::docs::list_docs))
        .route("/api/docs/{*slug}", get(handlers::docs::get_doc));

    let base = &state.site.base_path;
    let page_routes = Router::new()
        .route("/", get(handlers::pages::home))
        .route(&format!("/{base}"), get(|| async { Redirect::to("/") }))
        .route(&format!("/{base}/{{*slug}}"), get(handlers::pages::document))
        .route("/assets/{name}", get(static_files::serve_asset));

    Router::new()
        .merge(api_routes)
        .merge(page_routes)
        .fallback(handlers::pages::not_found)
        .layer(
            ServiceBuilder::new()
                .layer(security::content_type_options_layer())
                .layer(security::frame_options_layer()),
        )
        .with_state(state)
}
