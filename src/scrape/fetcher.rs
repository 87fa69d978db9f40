//! HTTP fetcher with bounded retries and exponential backoff
//!
//! This module handles all HTTP requests for the pipeline, including:
//! - Building the HTTP client with the configured user agent
//! - GET requests with a bounded attempt loop
//! - Exponential backoff between failed attempts
//! - Internal-only classification of transport failures

use reqwest::Client;
use std::time::Duration;
use thiserror::Error;

use crate::config::ScraperConfig;
use crate::SiftError;

/// Fetcher configuration
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// User-agent string sent with every request
    pub user_agent: String,

    /// Per-request timeout
    pub timeout: Duration,

    /// Maximum number of fetch attempts per URL
    pub max_retries: u32,

    /// Base wait between attempts; attempt n waits `backoff_unit * 2^(n-1)`
    pub backoff_unit: Duration,
}

impl FetchConfig {
    /// Builds a fetch configuration from the `[scraper]` config table
    ///
    /// The backoff unit is one second in production; tests construct a
    /// `FetchConfig` directly with a shorter unit.
    pub fn from_scraper_config(config: &ScraperConfig) -> Self {
        Self {
            user_agent: config.user_agent.clone(),
            timeout: Duration::from_secs(config.request_timeout_secs),
            max_retries: config.max_retries,
            backoff_unit: Duration::from_secs(1),
        }
    }
}

/// Classification of a failed attempt
///
/// Logged inside the fetcher; callers only ever see success or absence.
#[derive(Debug, Error)]
enum FetchFailure {
    #[error("request timeout")]
    Timeout,

    #[error("connection error")]
    Connect,

    #[error("HTTP status {0}")]
    Status(u16),

    #[error("{0}")]
    Other(String),
}

fn classify(error: reqwest::Error) -> FetchFailure {
    if error.is_timeout() {
        FetchFailure::Timeout
    } else if error.is_connect() {
        FetchFailure::Connect
    } else {
        FetchFailure::Other(error.to_string())
    }
}

/// Builds an HTTP client with the configured user agent and timeout
pub fn build_http_client(config: &FetchConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(config.timeout)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Retrying page fetcher
pub struct Fetcher {
    client: Client,
    config: FetchConfig,
}

impl Fetcher {
    pub fn new(config: FetchConfig) -> Result<Self, SiftError> {
        let client = build_http_client(&config)?;
        Ok(Self { client, config })
    }

    /// Fetches a URL, retrying transport failures with exponential backoff
    ///
    /// Attempts run 1..=max. A failed attempt (timeout, connection error,
    /// non-2xx status, body read error) waits `backoff_unit * 2^(attempt-1)`
    /// before the next; the final attempt fails immediately. A 2xx response
    /// is returned as-is even if the body is empty.
    ///
    /// # Returns
    ///
    /// * `Some(body)` - Page content
    /// * `None` - All attempts exhausted
    pub async fn fetch(&self, url: &str) -> Option<String> {
        for attempt in 1..=self.config.max_retries {
            match self.try_fetch(url).await {
                Ok(body) => {
                    tracing::info!("successfully fetched {}", url);
                    return Some(body);
                }
                Err(failure) => {
                    tracing::warn!("attempt {} failed for {}: {}", attempt, url, failure);
                    if attempt < self.config.max_retries {
                        let wait = self.config.backoff_unit * 2u32.pow(attempt - 1);
                        tokio::time::sleep(wait).await;
                    }
                }
            }
        }

        tracing::error!(
            "failed to fetch {} after {} attempts",
            url,
            self.config.max_retries
        );
        None
    }

    async fn try_fetch(&self, url: &str) -> Result<String, FetchFailure> {
        let response = self.client.get(url).send().await.map_err(classify)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchFailure::Status(status.as_u16()));
        }

        response.text().await.map_err(classify)
    }
}

/// Injected capability for per-item secondary fetches
///
/// Extractors that need a detail page take this instead of a concrete HTTP
/// client, so they stay testable without live network access.
#[allow(async_fn_in_trait)]
pub trait DetailFetcher {
    async fn fetch_detail(&self, url: &str) -> Option<String>;
}

impl DetailFetcher for Fetcher {
    async fn fetch_detail(&self, url: &str) -> Option<String> {
        self.fetch(url).await
    }
}
