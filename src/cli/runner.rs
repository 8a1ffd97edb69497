//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::config::AppConfig;
use crate::error::{Error, Result};
use crate::listing::Listing;
use crate::model::Item;
use crate::repository::{PagedRepository, PostRepository};
use crate::types::NetworkState;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{info, warn};

/// Outcome of a CLI fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchSummary {
    /// Every item loaded, in page order
    pub items: Arc<Vec<Item>>,
    /// Pages appended
    pub pages_loaded: u32,
    /// Final network state
    pub network_state: Option<NetworkState>,
    /// Retries issued
    pub retries_used: u32,
    /// Whether the last page was reached
    pub exhausted: bool,
}

impl FetchSummary {
    /// Check if the fetch ended on a failure
    pub fn failed(&self) -> bool {
        self.network_state
            .as_ref()
            .is_some_and(NetworkState::is_error)
    }
}

/// Drive `listing` until `max_pages` pages are loaded (0 = no limit), the
/// listing is exhausted, or a failure outlasts `retries`
pub async fn fetch_pages(listing: &Listing, max_pages: u32, retries: u32) -> FetchSummary {
    let mut retries_used = 0;

    loop {
        listing.settled().await;
        let source = listing.current();
        let snapshot = source.snapshot();

        if snapshot.phase.is_failed() {
            if retries_used >= retries {
                break;
            }
            retries_used += 1;
            warn!(
                attempt = retries_used,
                page = snapshot
                    .pending_retry
                    .map(|request| request.page(source.config().first_page)),
                "retrying failed page"
            );
            if !listing.retry() {
                break;
            }
            continue;
        }

        if max_pages != 0 && snapshot.pages_loaded >= max_pages {
            break;
        }
        if !listing.paged_list().load_next() {
            break;
        }
    }

    let snapshot = listing.current().snapshot();
    FetchSummary {
        exhausted: snapshot.is_exhausted(),
        items: snapshot.items,
        pages_loaded: snapshot.pages_loaded,
        network_state: snapshot.network_state,
        retries_used,
    }
}

/// Output lines for a finished fetch
pub fn render(summary: &FetchSummary, format: OutputFormat) -> Vec<String> {
    match format {
        OutputFormat::Json => {
            let mut lines: Vec<String> = summary
                .items
                .iter()
                .map(|item| json!({ "type": "RECORD", "record": item }).to_string())
                .collect();
            lines.push(
                json!({
                    "type": "STATE",
                    "state": {
                        "pages": summary.pages_loaded,
                        "items": summary.items.len(),
                        "retries": summary.retries_used,
                        "exhausted": summary.exhausted,
                        "network_state": summary.network_state,
                    }
                })
                .to_string(),
            );
            lines
        }
        OutputFormat::Text => {
            let mut lines: Vec<String> = summary
                .items
                .iter()
                .map(|item| {
                    format!(
                        "{}\t{}x{}\t{}\t{}",
                        item.id,
                        item.width,
                        item.height,
                        item.color,
                        item.label()
                    )
                })
                .collect();
            let state = summary
                .network_state
                .as_ref()
                .map_or_else(|| "idle".to_string(), ToString::to_string);
            lines.push(format!(
                "{} items from {} pages ({state}{})",
                summary.items.len(),
                summary.pages_loaded,
                if summary.exhausted { ", end of listing" } else { "" }
            ));
            lines
        }
    }
}

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Fetch {
                pages,
                page_size,
                retries,
                format,
            } => self.fetch(*pages, *page_size, *retries, *format).await,
            Commands::Validate => self.validate(),
        }
    }

    /// Load the config file, or defaults when none is given
    fn load_config(&self) -> Result<AppConfig> {
        let config = match &self.cli.config {
            Some(path) => AppConfig::from_file(path)?,
            None => AppConfig::default(),
        };
        Ok(config.with_env_overrides())
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        let config = self.load_config()?;
        config.validate()?;

        self.output_message(&json!({
            "type": "LOG",
            "log": {
                "level": "INFO",
                "message": format!(
                    "Configuration is valid: {}{} with {} items per page",
                    config.api.base_url,
                    config.api.path,
                    config.listing.page_size
                )
            }
        }));
        Ok(())
    }

    /// Fetch pages and print them
    async fn fetch(
        &self,
        pages: u32,
        page_size: Option<u32>,
        retries: u32,
        format: OutputFormat,
    ) -> Result<()> {
        let config = self.load_config()?;
        let page_size = page_size.unwrap_or(config.listing.page_size);
        if page_size == 0 {
            return Err(Error::invalid_value("page_size", "must be greater than zero"));
        }

        let repository = PagedRepository::from_config(&config)?;
        let listing = repository.get_posts(page_size);

        info!(page_size, pages, retries, "fetching listing");
        let summary = fetch_pages(&listing, pages, retries).await;
        repository.cancel();

        for line in render(&summary, format) {
            println!("{line}");
        }

        info!(
            items = summary.items.len(),
            pages = summary.pages_loaded,
            exhausted = summary.exhausted,
            "fetch finished"
        );

        if summary.failed() {
            return Err(Error::Other(format!(
                "fetch stopped after {} pages: {}",
                summary.pages_loaded,
                summary
                    .network_state
                    .as_ref()
                    .and_then(NetworkState::message)
                    .unwrap_or_default()
            )));
        }
        Ok(())
    }

    /// Output a message
    fn output_message(&self, msg: &Value) {
        println!("{}", serde_json::to_string(msg).unwrap_or_default());
    }
}
