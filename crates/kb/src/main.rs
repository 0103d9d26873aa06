//! kb CLI - knowledge base documentation site.
//!
//! Provides commands for:
//! - `serve`: Start the documentation server
//! - `build`: Write the site as static HTML
//! - `nav`: Print the navigation tree as JSON

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{BuildArgs, NavArgs, ServeArgs};
use error::CliError;
use output::Output;

/// Application version from Cargo.toml.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// kb - Markdown/MDX knowledge base.
#[derive(Parser)]
#[command(name = "kb", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the documentation server.
    Serve(ServeArgs),
    /// Build the site as static HTML.
    Build(BuildArgs),
    /// Print the navigation tree as JSON.
    Nav(NavArgs),
}

impl Commands {
    fn verbose(&self) -> bool {
        match self {
            Self::Serve(args) => args.verbose,
            Self::Build(args) => args.verbose,
            Self::Nav(_) => false,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise RUST_LOG (default WARN)
    let filter = if cli.command.verbose() {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Serve(args) => tokio::runtime::Runtime::new()
            .map_err(CliError::from)
            .and_then(|rt| rt.block_on(args.execute(VERSION))),
        Commands::Build(args) => args.execute(VERSION),
        Commands::Nav(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_build_defaults() {
        let cli = Cli::try_parse_from(["kb", "build"]).unwrap();
        assert!(!cli.command.verbose());
    }

    #[test]
    fn test_serve_verbose() {
        let cli = Cli::try_parse_from(["kb", "serve", "-v", "-p", "8080"]).unwrap();
        assert!(cli.command.verbose());
    }

    #[test]
    fn test_nav_is_never_verbose() {
        let cli = Cli::try_parse_from(["kb", "nav", "-s", "content"]).unwrap();
        assert!(!cli.command.verbose());
    }

    #[test]
    fn test_invalid_port_rejected() {
        assert!(Cli::try_parse_from(["kb", "serve", "--port", "http"]).is_err());
    }

    #[test]
    fn test_build_writes_site() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let content = temp_dir.path().join("content");
        std::fs::create_dir_all(&content).unwrap();
        std::fs::write(content.join("intro.md"), "---\ntitle: Intro\n---\n").unwrap();
        std::fs::write(
            temp_dir.path().join("kb.toml"),
            "[docs]\nsource_dir = \"content\"\n",
        )
        .unwrap();
        let out = temp_dir.path().join("site");

        let config = temp_dir.path().join("kb.toml");
        let cli = Cli::try_parse_from([
            "kb".into(),
            "build".into(),
            "-c".into(),
            config.into_os_string(),
            "-o".into(),
            out.clone().into_os_string(),
        ])
        .unwrap();
        let Commands::Build(args) = cli.command else {
            panic!("expected build command");
        };

        args.execute(VERSION).unwrap();

        assert_eq!(
            std::fs::read_dir(out.join("docs")).unwrap().count(),
            1,
            "one document directory"
        );
        assert!(out.join("docs/intro/index.html").is_file());
    }
}
