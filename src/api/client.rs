//! Page-indexed API client

use crate::config::ApiConfig;
use crate::error::Result;
use crate::http::{HttpClient, HttpClientConfig, RawResponse};
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

/// Contract the page source relies on
///
/// `Ok` carries any completed exchange, successful or not; `Err` means the
/// request could not be completed at all.
#[async_trait]
pub trait PageApi: Send + Sync {
    /// Fetch one page
    async fn get_page(&self, index: u32, page_size: u32) -> Result<RawResponse>;
}

/// API client bound to one listing endpoint
#[derive(Debug)]
pub struct ApiClient {
    http: HttpClient,
    path: String,
    page_param: String,
    page_size_param: Option<String>,
}

impl ApiClient {
    /// Create a client over an existing transport
    pub fn new(http: HttpClient, path: impl Into<String>, page_param: impl Into<String>) -> Self {
        Self {
            http,
            path: path.into(),
            page_param: page_param.into(),
            page_size_param: None,
        }
    }

    /// Also send the page size under `param`
    #[must_use]
    pub fn with_page_size_param(mut self, param: impl Into<String>) -> Self {
        self.page_size_param = Some(param.into());
        self
    }

    /// Build the transport and client from config
    pub fn from_config(config: &ApiConfig) -> Result<Self> {
        config.validate()?;

        let mut builder = HttpClientConfig::builder()
            .base_url(&config.base_url)
            .timeout(Duration::from_secs(config.timeout_secs));

        if let Some(key) = &config.access_key {
            builder = builder.base_param(&config.auth_param, key);
        }
        if let Some(agent) = &config.user_agent {
            builder = builder.user_agent(agent);
        }
        if let Some(limit) = &config.rate_limit {
            builder = builder.rate_limit(limit.clone());
        }

        let http = HttpClient::with_config(builder.build())?;
        let client = Self::new(http, &config.path, &config.page_param);

        Ok(match &config.page_size_param {
            Some(param) => client.with_page_size_param(param),
            None => client,
        })
    }

    /// Query parameters for one page
    pub fn page_params(&self, index: u32, page_size: u32) -> Vec<(String, String)> {
        let mut params = vec![(self.page_param.clone(), index.to_string())];
        if let Some(param) = &self.page_size_param {
            params.push((param.clone(), page_size.to_string()));
        }
        params
    }
}

#[async_trait]
impl PageApi for ApiClient {
    async fn get_page(&self, index: u32, page_size: u32) -> Result<RawResponse> {
        debug!(page = index, page_size, "requesting page");
        self.http
            .get(&self.path, &self.page_params(index, page_size))
            .await
    }
}
