//! `kb nav` command implementation.
//!
//! Prints the navigation tree as JSON on stdout.

use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use kb_config::{CliSettings, Config};
use kb_server::server_config_from_config;

use crate::error::CliError;

/// Arguments for the nav command.
#[derive(Args)]
pub(crate) struct NavArgs {
    /// Path to configuration file (default: auto-discover kb.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Content source directory (overrides config).
    #[arg(short, long)]
    source_dir: Option<PathBuf>,
}

impl NavArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let cli_settings = CliSettings {
            source_dir: self.source_dir,
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        let index = server_config_from_config(&config, String::new()).content_index();
        let json = serde_json::to_string_pretty(&index.navigation())?;

        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{json}")?;
        Ok(())
    }
}
