//! HTML page handlers.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};

use crate::handlers::slug_segments;
use crate::state::AppState;
use crate::template;

/// Handle GET /.
pub(crate) async fn home(State(state): State<Arc<AppState>>) -> Html<String> {
    let nav = state.index.navigation();
    Html(template::render_home_page(&state.site, &nav))
}

/// Handle GET /{base}/{*slug}.
pub(crate) async fn document(
    Path(slug): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Response {
    let nav = state.index.navigation();
    match state.index.resolve_document(&slug_segments(&slug)) {
        Some(doc) => Html(template::render_document_page(&state.site, &nav, &doc)).into_response(),
        None => {
            tracing::debug!(slug = %slug, "Document not found");
            not_found_page(&state)
        }
    }
}

/// Fallback for unknown paths.
pub(crate) async fn not_found(State(state): State<Arc<AppState>>) -> Response {
    not_found_page(&state)
}

fn not_found_page(state: &AppState) -> Response {
    let nav = state.index.navigation();
    (
        StatusCode::NOT_FOUND,
        Html(template::render_not_found_page(&state.site, &nav)),
    )
        .into_response()
}
