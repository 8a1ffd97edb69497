//! Configuration types
//!
//! `AppConfig` describes the remote endpoint and how listings page through
//! it. It can be written in YAML; every field has a default so an empty
//! document is a valid (if unauthenticated) configuration.

use crate::decode::DecoderConfig;
use crate::error::{Error, Result};
use crate::http::RateLimiterConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable that overrides `api.access_key`
pub const ACCESS_KEY_ENV: &str = "PAGEFEED_ACCESS_KEY";

// ============================================================================
// Top-Level Config
// ============================================================================

/// Complete configuration loaded from YAML
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Remote endpoint
    #[serde(default)]
    pub api: ApiConfig,

    /// Paging behaviour
    #[serde(default)]
    pub listing: ListingConfig,
}

impl AppConfig {
    /// Parse a YAML document
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Load a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.display().to_string(),
            });
        }
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Replace the access key with the environment override, when set
    #[must_use]
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(key) = std::env::var(ACCESS_KEY_ENV) {
            if !key.is_empty() {
                self.api.access_key = Some(key);
            }
        }
        self
    }

    /// Check every section
    pub fn validate(&self) -> Result<()> {
        self.api.validate()?;
        self.listing.validate()
    }
}

// ============================================================================
// API Config
// ============================================================================

/// Remote page-indexed endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL, e.g. `https://api.unsplash.com/`
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Listing path relative to the base URL
    #[serde(default = "default_path")]
    pub path: String,

    /// Query parameter carrying the page index
    #[serde(default = "default_page_param")]
    pub page_param: String,

    /// Query parameter carrying the page size, if the API accepts one
    #[serde(default = "default_page_size_param")]
    pub page_size_param: Option<String>,

    /// Query parameter carrying the access key
    #[serde(default = "default_auth_param")]
    pub auth_param: String,

    /// Access key sent as `auth_param`
    #[serde(default)]
    pub access_key: Option<String>,

    /// Response header reporting the total page count
    #[serde(default = "default_total_pages_header")]
    pub total_pages_header: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// User agent override
    #[serde(default)]
    pub user_agent: Option<String>,

    /// Client-side rate limit
    #[serde(default)]
    pub rate_limit: Option<RateLimiterConfig>,

    /// How page bodies are decoded
    #[serde(default)]
    pub decoder: DecoderConfig,
}

fn default_base_url() -> String {
    "https://api.unsplash.com/".to_string()
}

fn default_path() -> String {
    "photos".to_string()
}

fn default_page_param() -> String {
    "page".to_string()
}

fn default_page_size_param() -> Option<String> {
    Some("per_page".to_string())
}

fn default_auth_param() -> String {
    "client_id".to_string()
}

fn default_total_pages_header() -> String {
    "X-Total".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            path: default_path(),
            page_param: default_page_param(),
            page_size_param: default_page_size_param(),
            auth_param: default_auth_param(),
            access_key: None,
            total_pages_header: default_total_pages_header(),
            timeout_secs: default_timeout_secs(),
            user_agent: None,
            rate_limit: None,
            decoder: DecoderConfig::default(),
        }
    }
}

impl ApiConfig {
    /// Config pointing at `base_url` with every other field defaulted
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Check the endpoint description
    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.base_url)?;
        if self.page_param.trim().is_empty() {
            return Err(Error::missing_field("api.page_param"));
        }
        if self.total_pages_header.trim().is_empty() {
            return Err(Error::missing_field("api.total_pages_header"));
        }
        if self.timeout_secs == 0 {
            return Err(Error::invalid_value(
                "api.timeout_secs",
                "must be greater than zero",
            ));
        }
        Ok(())
    }
}

// ============================================================================
// Listing Config
// ============================================================================

/// How a listing pages through the endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingConfig {
    /// Items requested per page
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Index of the first page
    #[serde(default = "default_first_page")]
    pub first_page: u32,

    /// How close to the end of the collection an access must be to request
    /// the next page; defaults to the page size
    #[serde(default)]
    pub prefetch_distance: Option<usize>,

    /// Upper bound on fetches running at once across one repository
    #[serde(default = "default_max_concurrent_fetches")]
    pub max_concurrent_fetches: usize,
}

fn default_page_size() -> u32 {
    30
}

fn default_first_page() -> u32 {
    1
}

fn default_max_concurrent_fetches() -> usize {
    4
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            first_page: default_first_page(),
            prefetch_distance: None,
            max_concurrent_fetches: default_max_concurrent_fetches(),
        }
    }
}

impl ListingConfig {
    /// Check the paging parameters
    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(Error::invalid_value(
                "listing.page_size",
                "must be greater than zero",
            ));
        }
        if self.first_page == 0 {
            return Err(Error::invalid_value(
                "listing.first_page",
                "page indices start at 1",
            ));
        }
        if self.max_concurrent_fetches == 0 {
            return Err(Error::invalid_value(
                "listing.max_concurrent_fetches",
                "must be greater than zero",
            ));
        }
        Ok(())
    }

    /// Effective prefetch distance for a given page size
    pub fn prefetch_distance_for(&self, page_size: u32) -> usize {
        self.prefetch_distance.unwrap_or(page_size as usize)
    }
}
