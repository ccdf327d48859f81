//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Freshdesk extract connector
#[derive(Parser, Debug)]
#[command(name = "freshdesk-connector")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (JSON)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// State file (JSON); updated in place at every checkpoint
    #[arg(short, long, global = true)]
    pub state: Option<PathBuf>,

    /// Inline state JSON (not persisted)
    #[arg(long, global = true, conflicts_with = "state")]
    pub state_json: Option<String>,

    /// Output format for check and discover
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Test connection to the API
    Check,

    /// Print the catalog of available streams
    Discover,

    /// Sync the streams selected in a catalog
    Sync {
        /// Catalog file (JSON) with selection metadata
        #[arg(long)]
        catalog: Option<PathBuf>,
    },
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one message per line)
    Json,
    /// Human-readable output
    Pretty,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sync() {
        let cli = Cli::parse_from([
            "freshdesk-connector",
            "--config",
            "config.json",
            "sync",
            "--catalog",
            "catalog.json",
            "--state",
            "state.json",
        ]);

        assert_eq!(cli.config, Some(PathBuf::from("config.json")));
        assert_eq!(cli.state, Some(PathBuf::from("state.json")));
        assert!(matches!(
            cli.command,
            Commands::Sync { catalog: Some(ref p) } if p == &PathBuf::from("catalog.json")
        ));
    }

    #[test]
    fn test_parse_discover_pretty() {
        let cli = Cli::parse_from(["freshdesk-connector", "discover", "-c", "c.json", "-f", "pretty"]);
        assert!(matches!(cli.command, Commands::Discover));
        assert_eq!(cli.format, OutputFormat::Pretty);
    }

    #[test]
    fn test_state_options_conflict() {
        let result = Cli::try_parse_from([
            "freshdesk-connector",
            "check",
            "--state",
            "s.json",
            "--state-json",
            "{}",
        ]);
        assert!(result.is_err());
    }
}
