//! Content error types.

use std::path::PathBuf;

use crate::document::FrontmatterError;

/// Error raised while loading a single content file.
///
/// Aggregate operations never return this: they log it and skip the entry.
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    /// The file could not be read.
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The frontmatter block is present but cannot be parsed.
    #[error("Malformed frontmatter in {}: {source}", path.display())]
    MalformedHeader {
        path: PathBuf,
        source: FrontmatterError,
    },
}

impl ContentError {
    /// Path of the file that failed to load.
    #[must_use]
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::Io { path, .. } | Self::MalformedHeader { path, .. } => path,
        }
    }
}
