//! Application state.
//!
//! Shared state for all request handlers.

use kb_content::ContentIndex;

use crate::template::SiteOptions;

/// Application state shared across all handlers.
pub(crate) struct AppState {
    /// Content directory reader.
    pub(crate) index: ContentIndex,
    /// Site presentation.
    pub(crate) site: SiteOptions,
    /// Application version for `ETag` salting.
    pub(crate) version: String,
}
