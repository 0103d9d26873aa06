//! Embedded stylesheet and client script.

use axum::extract::Path;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};

/// A file served under `/assets/`.
pub(crate) struct Asset {
    /// File name below `/assets/`.
    pub name: &'static str,
    pub content_type: &'static str,
    pub body: &'static str,
}

/// All embedded assets.
pub(crate) const ASSETS: [Asset; 2] = [
    Asset {
        name: "style.css",
        content_type: "text/css; charset=utf-8",
        body: include_str!("../assets/style.css"),
    },
    Asset {
        name: "app.js",
        content_type: "text/javascript; charset=utf-8",
        body: include_str!("../assets/app.js"),
    },
];

/// Look up an embedded asset by file name.
pub(crate) fn get(name: &str) -> Option<&'static Asset> {
    ASSETS.iter().find(|asset| asset.name == name)
}

/// Handle GET /assets/{name}.
pub(crate) async fn serve_asset(Path(name): Path<String>) -> Response {
    match get(&name) {
        Some(asset) => (
            [
                (header::CONTENT_TYPE, asset.content_type),
                (header::CACHE_CONTROL, "public, max-age=3600"),
            ],
            asset.body,
        )
            .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_known_assets() {
        assert!(get("style.css").is_some_and(|a| a.body.contains(".callout")));
        assert!(get("app.js").is_some_and(|a| a.body.contains("mermaid")));
        assert!(get("missing.js").is_none());
    }

    #[test]
    fn test_script_wires_rendered_markup() {
        let script = get("app.js").unwrap().body;
        for hook in ["data-copy-code", "dataset.shikiSrc", "codeToHtml", "IntersectionObserver", ".toc a"] {
            assert!(script.contains(hook), "app.js does not reference {hook}");
        }

        let style = get("style.css").unwrap().body;
        assert!(style.contains(".copy-button"));
        assert!(style.contains(".toc a.active"));
    }
}
