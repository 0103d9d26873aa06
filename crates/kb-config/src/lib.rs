//! Configuration management for the kb documentation site.
//!
//! Parses `kb.toml` with serde. When no path is given, the file is searched
//! for in the current directory and its parents; without one, defaults apply
//! relative to the current directory.
//!
//! ```toml
//! [server]
//! host = "${KB_HOST:-127.0.0.1}"
//! port = 7979
//!
//! [docs]
//! source_dir = "content/docs"
//! base_path = "docs"
//!
//! [site]
//! title = "Knowledge Base"
//! description = "Team handbook"
//!
//! [metadata]
//! name = "_meta.yaml"
//!
//! [diagrams]
//! mermaid_url = "https://cdn.example.com/mermaid.esm.min.mjs"
//!
//! [highlight]
//! shiki_url = "https://cdn.example.com/shiki.mjs"
//! light_theme = "github-light"
//! dark_theme = "github-dark"
//! ```
//!
//! ## Environment Variable Expansion
//!
//! - `${VAR}` expands to the value of VAR and errors if unset
//! - `${VAR:-default}` expands to VAR if set, otherwise to the default
//!
//! Expanded fields: `server.host`, `site.title`, `diagrams.mermaid_url`,
//! `highlight.shiki_url`.

mod expand;

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "kb.toml";

/// URL prefixes served by the site itself, unavailable as `docs.base_path`.
const RESERVED_BASE_PATHS: [&str; 2] = ["api", "assets"];

/// CLI settings that override configuration file values.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override server host.
    pub host: Option<String>,
    /// Override server port.
    pub port: Option<u16>,
    /// Override content source directory.
    pub source_dir: Option<PathBuf>,
}

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// Content configuration as written (paths relative to the config file).
    docs: DocsConfigRaw,
    /// Site presentation.
    pub site: SiteConfig,
    /// Directory metadata configuration.
    pub metadata: MetadataConfig,
    /// Diagram rendering configuration.
    pub diagrams: DiagramsConfig,
    /// Code highlighting configuration.
    pub highlight: HighlightConfig,

    /// Resolved content configuration (set after loading).
    #[serde(skip)]
    pub docs_resolved: DocsConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Server configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 7979,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct DocsConfigRaw {
    source_dir: Option<String>,
    base_path: Option<String>,
}

/// Resolved content configuration.
#[derive(Debug, Default)]
pub struct DocsConfig {
    /// Directory holding the Markdown/MDX content.
    pub source_dir: PathBuf,
    /// First URL segment of every document link.
    pub base_path: String,
}

/// Site presentation configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Site title shown in the header and page titles.
    pub title: String,
    /// Description shown on the home page.
    pub description: Option<String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Knowledge Base".to_owned(),
            description: None,
        }
    }
}

/// Directory metadata configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct MetadataConfig {
    /// Filename for directory metadata sidecar files.
    pub name: String,
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            name: "_meta.yaml".to_owned(),
        }
    }
}

/// Diagram rendering configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DiagramsConfig {
    /// Mermaid ES module URL. A public CDN build is used when unset.
    pub mermaid_url: Option<String>,
}

/// Code highlighting configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    /// Set to `false` to ship code blocks unhighlighted.
    pub enabled: bool,
    /// Shiki ES module URL. A public CDN build is used when unset.
    pub shiki_url: Option<String>,
    /// Shiki theme for the light color scheme.
    pub light_theme: String,
    /// Shiki theme for the dark color scheme.
    pub dark_theme: String,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            shiki_url: None,
            light_theme: "github-light".to_owned(),
            dark_theme: "github-dark".to_owned(),
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`server.host`").
        field: String,
        /// Error message (e.g., "${`KB_HOST`} not set").
        message: String,
    },
}

fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file. Otherwise, searches
    /// for `kb.toml` in the current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails or
    /// a value is invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(host) = &settings.host {
            self.server.host.clone_from(host);
        }
        if let Some(port) = settings.port {
            self.server.port = port;
        }
        if let Some(source_dir) = &settings.source_dir {
            self.docs_resolved.source_dir.clone_from(source_dir);
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to `base`.
    fn default_with_base(base: &Path) -> Self {
        Self {
            server: ServerConfig::default(),
            docs: DocsConfigRaw::default(),
            site: SiteConfig::default(),
            metadata: MetadataConfig::default(),
            diagrams: DiagramsConfig::default(),
            highlight: HighlightConfig::default(),
            docs_resolved: DocsConfig {
                source_dir: base.join("content/docs"),
                base_path: "docs".to_owned(),
            },
            config_path: None,
        }
    }

    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.server.host, "server.host")?;
        if self.server.port == 0 {
            return Err(ConfigError::Validation("server.port cannot be 0".to_owned()));
        }

        let base_path = &self.docs_resolved.base_path;
        require_non_empty(base_path, "docs.base_path")?;
        if base_path.starts_with('/') || base_path.ends_with('/') {
            return Err(ConfigError::Validation(
                "docs.base_path cannot start or end with '/'".to_owned(),
            ));
        }
        let valid_segment = |segment: &str| {
            !segment.is_empty()
                && segment
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        };
        if !base_path.split('/').all(valid_segment) {
            return Err(ConfigError::Validation(format!(
                "docs.base_path '{base_path}' may only contain letters, digits, '-', '_', '.' and '/'"
            )));
        }
        let first_segment = base_path.split('/').next().unwrap_or_default();
        if RESERVED_BASE_PATHS.contains(&first_segment) {
            return Err(ConfigError::Validation(format!(
                "docs.base_path cannot be '{base_path}' (reserved)"
            )));
        }

        require_non_empty(&self.metadata.name, "metadata.name")?;

        if let Some(url) = &self.diagrams.mermaid_url {
            require_http_url(url, "diagrams.mermaid_url")?;
        }
        if let Some(url) = &self.highlight.shiki_url {
            require_http_url(url, "highlight.shiki_url")?;
        }
        require_non_empty(&self.highlight.light_theme, "highlight.light_theme")?;
        require_non_empty(&self.highlight.dark_theme, "highlight.dark_theme")?;

        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.server.host = expand::expand_env(&self.server.host, "server.host")?;
        self.site.title = expand::expand_env(&self.site.title, "site.title")?;

        if let Some(url) = &self.diagrams.mermaid_url {
            self.diagrams.mermaid_url = Some(expand::expand_env(url, "diagrams.mermaid_url")?);
        }
        if let Some(url) = &self.highlight.shiki_url {
            self.highlight.shiki_url = Some(expand::expand_env(url, "highlight.shiki_url")?);
        }

        Ok(())
    }

    /// Resolve relative paths against the config file's directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        self.docs_resolved = DocsConfig {
            source_dir: config_dir.join(self.docs.source_dir.as_deref().unwrap_or("content/docs")),
            base_path: self.docs.base_path.clone().unwrap_or_else(|| "docs".to_owned()),
        };
    }
}
