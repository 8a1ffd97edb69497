//! CLI module
//!
//! Command-line interface for fetching listings.
//!
//! # Commands
//!
//! - `fetch` - Load pages and print the items
//! - `validate` - Check the configuration file

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::{fetch_pages, render, FetchSummary, Runner};
