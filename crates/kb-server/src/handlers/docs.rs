//! Documents API endpoints.
//!
//! `GET /api/docs` lists every document. `GET /api/docs/{*slug}` returns one
//! document with its outline and rendered HTML, revalidated through `ETag`.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use kb_content::{Document, TocEntry, extract_table_of_contents};
use md5::{Digest, Md5};
use serde::Serialize;

use crate::error::ServerError;
use crate::handlers::slug_segments;
use crate::state::AppState;
use crate::template;

/// Document summary in GET /api/docs.
#[derive(Serialize)]
pub(crate) struct DocSummary {
    slug: String,
    href: String,
    title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    category: Option<String>,
    tags: Vec<String>,
}

impl DocSummary {
    fn new(doc: Document, base_path: &str) -> Self {
        let href = doc.href(base_path);
        Self {
            slug: doc.slug,
            href,
            title: doc.frontmatter.title,
            description: doc.frontmatter.description,
            category: doc.frontmatter.category,
            tags: doc.frontmatter.tags,
        }
    }
}

/// Response for GET /api/docs/{slug}.
#[derive(Serialize)]
struct DocResponse {
    /// Document metadata.
    meta: DocMeta,
    /// `##`/`###` outline.
    toc: Vec<TocEntry>,
    /// Rendered HTML body.
    content: String,
}

#[derive(Serialize)]
struct DocMeta {
    slug: String,
    href: String,
    title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    category: Option<String>,
    tags: Vec<String>,
}

/// Handle GET /api/docs.
pub(crate) async fn list_docs(State(state): State<Arc<AppState>>) -> Json<Vec<DocSummary>> {
    let base_path = &state.index.options().base_path;
    Json(
        state
            .index
            .list_all_documents()
            .into_iter()
            .map(|doc| DocSummary::new(doc, base_path))
            .collect(),
    )
}

/// Handle GET /api/docs/{*slug}.
pub(crate) async fn get_doc(
    Path(slug): Path<String>,
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, ServerError> {
    let Some(doc) = state.index.resolve_document(&slug_segments(&slug)) else {
        tracing::debug!(slug = %slug, "Document not found");
        return Err(ServerError::DocumentNotFound(slug));
    };

    let toc = extract_table_of_contents(&doc.content);
    let content = template::render_body(&doc);
    let href = doc.href(&state.index.options().base_path);
    let response = DocResponse {
        meta: DocMeta {
            slug: doc.slug,
            href,
            title: doc.frontmatter.title,
            description: doc.frontmatter.description,
            date: doc.frontmatter.date,
            category: doc.frontmatter.category,
            tags: doc.frontmatter.tags,
        },
        toc,
        content,
    };
    let body = serde_json::to_string(&response)?;

    let etag = compute_etag(&state.version, &body);
    if let Some(if_none_match) = headers.get(header::IF_NONE_MATCH)
        && if_none_match.as_bytes() == etag.as_bytes()
    {
        return Ok(StatusCode::NOT_MODIFIED.into_response());
    }

    Ok((
        [
            (header::CONTENT_TYPE, "application/json".to_owned()),
            (header::ETAG, etag),
            (header::CACHE_CONTROL, "private, max-age=60".to_owned()),
        ],
        body,
    )
        .into_response())
}

/// Compute a quoted `ETag` from the application version and response body.
fn compute_etag(version: &str, body: &str) -> String {
    let hash = Md5::digest(format!("{version}:{body}").as_bytes());
    format!("\"{}\"", &hex::encode(hash)[..16])
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_compute_etag_format() {
        let etag = compute_etag("1.0.0", "{}");

        assert_eq!(etag.len(), 18);
        assert!(etag.starts_with('"') && etag.ends_with('"'));
        assert!(etag[1..17].chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_compute_etag_salted_by_version() {
        assert_eq!(compute_etag("1.0.0", "body"), compute_etag("1.0.0", "body"));
        assert_ne!(compute_etag("1.0.0", "body"), compute_etag("1.0.1", "body"));
        assert_ne!(compute_etag("1.0.0", "body"), compute_etag("1.0.0", "other"));
    }
}
