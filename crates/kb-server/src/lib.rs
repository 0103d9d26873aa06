//! HTTP server for the kb documentation site.
//!
//! Serves the content directory as HTML pages and a small JSON API:
//!
//! - `GET /` home page with the navigation tree
//! - `GET /{base}/{*slug}` document pages
//! - `GET /api/navigation`, `GET /api/docs`, `GET /api/docs/{*slug}`
//! - `GET /assets/{file}` stylesheet and client script
//!
//! Every request reads the content directory afresh, so edits show up on the
//! next reload without a restart.
//!
//! The same page templates back [`build_static_site`], which writes the whole
//! site to a directory for hosting without a server.
//!
//! # Quick Start
//!
//! ```ignore
//! use kb_server::{ServerConfig, run_server};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ServerConfig {
//!         source_dir: "content/docs".into(),
//!         ..ServerConfig::default()
//!     };
//!     run_server(config).await.unwrap();
//! }
//! ```

mod app;
mod builder;
mod error;
mod handlers;
mod middleware;
mod state;
mod static_files;
mod template;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use kb_content::{ContentIndex, IndexOptions};
use state::AppState;

pub use builder::{BuildError, BuildSummary, build_static_site};
pub use error::ServerError;
pub use template::{DEFAULT_MERMAID_URL, DEFAULT_SHIKI_URL, HighlightOptions, SiteOptions};

/// Server configuration.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Content source directory.
    pub source_dir: PathBuf,
    /// Directory metadata sidecar file name.
    pub meta_filename: String,
    /// Site presentation.
    pub site: SiteOptions,
    /// Application version (salts `ETag` values).
    pub version: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 7979,
            source_dir: PathBuf::from("content/docs"),
            meta_filename: IndexOptions::default().meta_filename,
            site: SiteOptions::default(),
            version: String::new(),
        }
    }
}

impl ServerConfig {
    /// Content index over the configured source directory.
    #[must_use]
    pub fn content_index(&self) -> ContentIndex {
        ContentIndex::with_options(
            self.source_dir.clone(),
            IndexOptions {
                base_path: self.site.base_path.clone(),
                meta_filename: self.meta_filename.clone(),
            },
        )
    }
}

/// Run the server until Ctrl-C.
///
/// # Errors
///
/// Returns an error if the address is invalid or the listener cannot bind.
pub async fn run_server(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    if !config.source_dir.is_dir() {
        tracing::warn!(
            path = %config.source_dir.display(),
            "Content directory does not exist, serving an empty site"
        );
    }

    let state = Arc::new(AppState {
        index: config.content_index(),
        site: config.site.clone(),
        version: config.version.clone(),
    });

    let app = app::create_router(state);

    let addr = SocketAddr::from_str(&format!("{}:{}", config.host, config.port))?;
    tracing::info!(
        address = %addr,
        source = %config.source_dir.display(),
        "Starting server"
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Wait for Ctrl-C.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, stopping server...");
}

/// Create server configuration from kb config.
#[must_use]
pub fn server_config_from_config(config: &kb_config::Config, version: String) -> ServerConfig {
    ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
        source_dir: config.docs_resolved.source_dir.clone(),
        meta_filename: config.metadata.name.clone(),
        site: SiteOptions::from_config(config),
        version,
    }
}
