//! Static site builder.
//!
//! Writes every page the server would render to an output directory:
//!
//! ```text
//! dist/
//! ├── index.html
//! ├── 404.html
//! ├── assets/style.css
//! ├── assets/app.js
//! └── docs/guides/writing-mdx/index.html
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use kb_content::ContentIndex;

use crate::static_files::ASSETS;
use crate::template::{self, SiteOptions};

/// Error returned by the static site builder.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// Writing an output file failed.
    #[error("Failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result of a static build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildSummary {
    /// Output directory.
    pub out_dir: PathBuf,
    /// Number of document pages written.
    pub documents: usize,
    /// Number of files written, including assets.
    pub files: usize,
}

/// Render the whole site into `out_dir`.
///
/// Existing files in `out_dir` are overwritten but never removed.
///
/// # Errors
///
/// Returns `BuildError::Io` if a directory or file cannot be written.
pub fn build_static_site(
    index: &ContentIndex,
    site: &SiteOptions,
    out_dir: &Path,
) -> Result<BuildSummary, BuildError> {
    let nav = index.navigation();
    let mut files = 0;

    write_file(&out_dir.join("index.html"), &template::render_home_page(site, &nav))?;
    write_file(&out_dir.join("404.html"), &template::render_not_found_page(site, &nav))?;
    files += 2;

    for asset in &ASSETS {
        write_file(&out_dir.join("assets").join(asset.name), asset.body)?;
        files += 1;
    }

    let documents = index.list_all_documents();
    for doc in &documents {
        let mut path = out_dir.join(&site.base_path);
        path.extend(doc.segments());
        path.push("index.html");

        write_file(&path, &template::render_document_page(site, &nav, doc))?;
        tracing::debug!(slug = %doc.slug, path = %path.display(), "Wrote page");
        files += 1;
    }

    let summary = BuildSummary {
        out_dir: out_dir.to_path_buf(),
        documents: documents.len(),
        files,
    };
    tracing::info!(
        out_dir = %summary.out_dir.display(),
        documents = summary.documents,
        files = summary.files,
        "Static site built"
    );
    Ok(summary)
}

fn write_file(path: &Path, content: &str) -> Result<(), BuildError> {
    let io_err = |source| BuildError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    fs::write(path, content).map_err(io_err)
}
