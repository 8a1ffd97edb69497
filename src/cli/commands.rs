//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Page-by-page listing fetcher
#[derive(Parser, Debug)]
#[command(name = "pagefeed")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (YAML)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch pages of the listing and print the items
    Fetch {
        /// Stop after this many pages (0 = until exhausted)
        #[arg(long, default_value = "1")]
        pages: u32,

        /// Items per page (defaults to listing.page_size)
        #[arg(long)]
        page_size: Option<u32>,

        /// Retries per failed page
        #[arg(long, default_value = "0")]
        retries: u32,

        /// Output format
        #[arg(short, long, default_value = "json")]
        format: OutputFormat,
    },

    /// Validate the configuration file
    Validate,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one message per line)
    Json,
    /// Human-readable output
    Text,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_defaults() {
        let cli = Cli::try_parse_from(["pagefeed", "fetch"]).unwrap();
        assert!(cli.config.is_none());
        assert!(!cli.verbose);
        match cli.command {
            Commands::Fetch {
                pages,
                page_size,
                retries,
                format,
            } => {
                assert_eq!(pages, 1);
                assert!(page_size.is_none());
                assert_eq!(retries, 0);
                assert_eq!(format, OutputFormat::Json);
            }
            Commands::Validate => panic!("Expected Fetch"),
        }
    }

    #[test]
    fn test_fetch_with_options() {
        let cli = Cli::try_parse_from([
            "pagefeed",
            "--config",
            "feed.yaml",
            "-v",
            "fetch",
            "--pages",
            "0",
            "--page-size",
            "10",
            "--retries",
            "2",
            "--format",
            "text",
        ])
        .unwrap();

        assert_eq!(cli.config, Some(PathBuf::from("feed.yaml")));
        assert!(cli.verbose);
        assert!(matches!(
            cli.command,
            Commands::Fetch {
                pages: 0,
                page_size: Some(10),
                retries: 2,
                format: OutputFormat::Text,
            }
        ));
    }

    #[test]
    fn test_validate_accepts_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["pagefeed", "validate", "-c", "feed.yaml"]).unwrap();
        assert!(matches!(cli.command, Commands::Validate));
        assert_eq!(cli.config, Some(PathBuf::from("feed.yaml")));
    }

    #[test]
    fn test_unknown_format_is_rejected() {
        assert!(Cli::try_parse_from(["pagefeed", "fetch", "--format", "xml"]).is_err());
    }
}
