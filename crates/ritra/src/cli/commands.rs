//! CLI command definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Ritra - turn a book title into a narrated, illustrated short video
#[derive(Parser, Debug)]
#[command(name = "ritra")]
#[command(about = "Turn a book title into a narrated, illustrated short video", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file loaded over the bundled defaults
    #[arg(short, long, global = true, env = "RITRA_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Run the HTTP front door
    Serve {
        /// Listen address (overrides server.bind)
        #[arg(long)]
        bind: Option<String>,
    },

    /// Execute one run inline and print the summary as JSON
    Run {
        /// Source tag recorded with the run
        #[arg(long, default_value = "cli")]
        source: String,

        /// Lookup reference (spreadsheet row)
        #[arg(long)]
        reference: Option<String>,

        /// Use this title instead of looking one up
        #[arg(long)]
        title: Option<String>,
    },

    /// Print the effective configuration
    Config,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_run_with_title() {
        let cli = Cli::try_parse_from(["ritra", "run", "--title", "Dune", "--reference", "7"])
            .unwrap();
        assert_eq!(
            cli.command,
            Commands::Run {
                source: "cli".to_string(),
                reference: Some("7".to_string()),
                title: Some("Dune".to_string()),
            }
        );
        assert!(!cli.verbose);
    }

    #[test]
    fn test_parse_serve_with_global_flags() {
        let cli = Cli::try_parse_from([
            "ritra",
            "serve",
            "--bind",
            "127.0.0.1:9000",
            "--verbose",
            "--config",
            "custom.toml",
        ])
        .unwrap();
        assert_eq!(
            cli.command,
            Commands::Serve {
                bind: Some("127.0.0.1:9000".to_string())
            }
        );
        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("custom.toml")));
    }

    #[test]
    fn test_subcommand_required() {
        assert!(Cli::try_parse_from(["ritra"]).is_err());
    }
}
