//! Remote exchange rate source
//!
//! Defines the `RateSource` capability the provider depends on and its
//! production implementation backed by the ExchangeRate-API "latest" endpoint.

use reqwest::Client;
use serde::Deserialize;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;

use super::RateTable;

/// Placeholder in the API URL template replaced by the base currency code
pub const BASE_PLACEHOLDER: &str = "{base}";

/// Status value the API reports for a successful response
const SUCCESS_RESULT: &str = "success";

/// Errors that can occur when fetching a rate table
#[derive(Debug, Error)]
pub enum SourceError {
    /// HTTP request failed (connection, DNS, timeout)
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Failed to parse JSON response
    #[error("Failed to parse JSON response: {0}")]
    Parse(#[from] serde_json::Error),

    /// Missing expected field in response
    #[error("Missing expected field in response: {0}")]
    MissingField(String),

    /// The service answered but reported a failure
    #[error("{0}")]
    Upstream(String),
}

impl SourceError {
    /// Returns true for failures where the service itself reported an error,
    /// as opposed to transport or decoding problems
    pub fn is_upstream(&self) -> bool {
        matches!(self, SourceError::Upstream(_))
    }
}

/// Something that can fetch the latest rate table for a base currency
pub trait RateSource {
    /// Fetches rates relative to one unit of `base`
    fn fetch_rates(&self, base: &str) -> impl Future<Output = Result<RateTable, SourceError>> + Send;
}

/// Response body from the rate service
#[derive(Debug, Deserialize)]
struct ApiResponse {
    result: String,
    #[serde(default)]
    rates: Option<RateTable>,
    #[serde(rename = "error-type", default)]
    error_type: Option<String>,
}

/// Client for fetching rates over HTTP
#[derive(Debug, Clone)]
pub struct HttpRateSource {
    client: Client,
    /// URL template containing `{base}`
    api_url: String,
}

impl HttpRateSource {
    /// Create a new HttpRateSource for the URL template, bounding every request by `timeout`
    pub fn new(api_url: impl Into<String>, timeout: Duration) -> Result<Self, SourceError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, api_url))
    }

    /// Create a new HttpRateSource with a custom HTTP client
    pub fn with_client(client: Client, api_url: impl Into<String>) -> Self {
        Self {
            client,
            api_url: api_url.into(),
        }
    }

    /// Returns the request URL for `base`
    pub fn url_for(&self, base: &str) -> String {
        self.api_url.replace(BASE_PLACEHOLDER, base)
    }
}

impl RateSource for HttpRateSource {
    async fn fetch_rates(&self, base: &str) -> Result<RateTable, SourceError> {
        let url = self.url_for(base);
        tracing::debug!(%url, "fetching exchange rates");

        // Error bodies carry the `error-type`, so the status code is not checked
        let response = self.client.get(&url).send().await?;
        let text = response.text().await?;

        parse_response(&text)
    }
}

/// Parse a response body into a rate table
fn parse_response(body: &str) -> Result<RateTable, SourceError> {
    let response: ApiResponse = serde_json::from_str(body)?;

    if response.result != SUCCESS_RESULT {
        let error_type = response
            .error_type
            .unwrap_or_else(|| "Unknown error".to_string());
        return Err(SourceError::Upstream(error_type));
    }

    response
        .rates
        .ok_or_else(|| SourceError::MissingField("rates".to_string()))
}
