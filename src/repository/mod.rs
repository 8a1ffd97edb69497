//! Repository module
//!
//! Entry point for consumers: hands out listings and owns the fetch scope
//! they run in.

use crate::api::{ApiClient, PageApi};
use crate::config::{AppConfig, ListingConfig};
use crate::decode::{ItemDecoder, JsonItemDecoder};
use crate::error::Result;
use crate::listing::Listing;
use crate::pagination::{PageSourceConfig, PageSourceFactory, DEFAULT_TOTAL_PAGES_HEADER};
use crate::scope::FetchScope;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Source of paged post listings
pub trait PostRepository: Send + Sync {
    /// Start a new listing with `page_size` items per page
    fn get_posts(&self, page_size: u32) -> Listing;

    /// Cancel every fetch started through this repository
    fn cancel(&self);
}

/// Repository backed by a page-indexed API
#[derive(Clone)]
pub struct PagedRepository {
    api: Arc<dyn PageApi>,
    decoder: Arc<dyn ItemDecoder>,
    listing: ListingConfig,
    total_pages_header: String,
    scope: FetchScope,
}

impl PagedRepository {
    /// Create a repository over an existing API client and decoder
    pub fn new(
        api: Arc<dyn PageApi>,
        decoder: Arc<dyn ItemDecoder>,
        listing: ListingConfig,
    ) -> Result<Self> {
        listing.validate()?;
        let scope = FetchScope::new(listing.max_concurrent_fetches)?;
        Ok(Self {
            api,
            decoder,
            listing,
            total_pages_header: DEFAULT_TOTAL_PAGES_HEADER.to_string(),
            scope,
        })
    }

    /// Read the total page count from `header`
    #[must_use]
    pub fn with_total_pages_header(mut self, header: impl Into<String>) -> Self {
        self.total_pages_header = header.into();
        self
    }

    /// Build the HTTP client, decoder and scope from config
    ///
    /// Must be called inside a Tokio runtime.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        config.validate()?;
        let api = ApiClient::from_config(&config.api)?;
        let decoder = JsonItemDecoder::from_config(&config.api.decoder);
        info!(
            base_url = %config.api.base_url,
            path = %config.api.path,
            authenticated = config.api.access_key.is_some(),
            "repository configured"
        );
        Ok(
            Self::new(Arc::new(api), Arc::new(decoder), config.listing.clone())?
                .with_total_pages_header(&config.api.total_pages_header),
        )
    }

    /// Paging settings for one listing
    pub fn source_config(&self, page_size: u32) -> PageSourceConfig {
        PageSourceConfig::new(page_size)
            .with_first_page(self.listing.first_page)
            .with_total_pages_header(&self.total_pages_header)
            .with_prefetch_distance(self.listing.prefetch_distance_for(page_size))
    }

    /// Scope every listing of this repository runs in
    pub fn scope(&self) -> &FetchScope {
        &self.scope
    }

    /// Check if [`PostRepository::cancel`] has been called
    pub fn is_cancelled(&self) -> bool {
        self.scope.is_cancelled()
    }
}

impl PostRepository for PagedRepository {
    fn get_posts(&self, page_size: u32) -> Listing {
        if self.scope.is_cancelled() {
            warn!("repository cancelled; listing will not fetch");
        }
        debug!(page_size, "starting listing");
        let factory = PageSourceFactory::new(
            Arc::clone(&self.api),
            Arc::clone(&self.decoder),
            self.source_config(page_size),
            self.scope.clone(),
        );
        Listing::new(Arc::new(factory))
    }

    fn cancel(&self) {
        if !self.scope.is_cancelled() {
            info!("cancelling repository fetches");
        }
        self.scope.cancel();
    }
}

impl std::fmt::Debug for PagedRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PagedRepository")
            .field("listing", &self.listing)
            .field("total_pages_header", &self.total_pages_header)
            .field("cancelled", &self.is_cancelled())
            .finish_non_exhaustive()
    }
}
