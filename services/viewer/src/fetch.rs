//! Per-year data fetching over HTTP.
//!
//! The resource for a year is derived from a fixed URL template containing
//! a `{year}` placeholder. A non-success response means "no data for this
//! year" — never a fatal condition, and there is no automatic retry.

use std::time::Duration;

use bytes::Bytes;
use reqwest::Client;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("No data for year {year} (HTTP {status})")]
    NoData { year: i32, status: u16 },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

/// Fetches the emission file for a selected year.
#[derive(Debug, Clone)]
pub struct YearFetcher {
    client: Client,
    url_template: String,
}

impl YearFetcher {
    /// Build a fetcher around a URL template containing `{year}`.
    pub fn new(url_template: String) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .connect_timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            url_template,
        })
    }

    /// Resource URL for a year.
    pub fn url_for(&self, year: i32) -> String {
        self.url_template.replace("{year}", &year.to_string())
    }

    /// Fetch the raw bytes for a year.
    pub async fn fetch(&self, year: i32) -> Result<Bytes, FetchError> {
        let url = self.url_for(year);
        debug!(%url, year, "fetching year data");

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::NoData {
                year,
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().await?;
        info!(year, size = bytes.len(), "fetched year data");
        Ok(bytes)
    }
}
