//! `kb build` command implementation.

use std::path::PathBuf;

use clap::Args;
use kb_config::{CliSettings, Config};
use kb_server::{build_static_site, server_config_from_config};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the build command.
#[derive(Args)]
pub(crate) struct BuildArgs {
    /// Path to configuration file (default: auto-discover kb.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Content source directory (overrides config).
    #[arg(short, long)]
    source_dir: Option<PathBuf>,

    /// Output directory for the generated site.
    #[arg(short, long, default_value = "dist")]
    output_dir: PathBuf,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl BuildArgs {
    pub(crate) fn execute(self, version: &str) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            source_dir: self.source_dir,
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        output.info(&format!(
            "Source: {}",
            config.docs_resolved.source_dir.display()
        ));
        output.info(&format!("Output: {}", self.output_dir.display()));

        let server_config = server_config_from_config(&config, version.to_owned());
        let summary = build_static_site(
            &server_config.content_index(),
            &server_config.site,
            &self.output_dir,
        )?;

        output.success(&format!(
            "Built {} documents ({} files) into {}",
            summary.documents,
            summary.files,
            summary.out_dir.display()
        ));
        Ok(())
    }
}
