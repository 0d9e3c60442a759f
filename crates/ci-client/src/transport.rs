//! HTTP transport layer for CoinGecko API requests

use ci_core::{ApiTier, Config, Endpoint, Error, Result};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, error, instrument, warn};
use url::Url;

/// HTTP transport layer for making requests to the CoinGecko API.
///
/// Every request carries the static API key header and an
/// `accept: application/json` header. Requests are attempted exactly once.
pub struct Transport {
  client: Client,
  base_url: String,
  api_tier: ApiTier,
  timeout: Option<Duration>,
}

impl Transport {
  /// Create a new transport instance
  pub fn new(config: &Config) -> Result<Self> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

    let key_header = HeaderName::from_static(config.api_tier.header_name());
    let mut key_value = HeaderValue::from_str(&config.api_key)
      .map_err(|_| Error::ApiKey("API key is not a valid header value".to_string()))?;
    key_value.set_sensitive(true);
    headers.insert(key_header, key_value);

    let timeout = config.timeout_secs.map(Duration::from_secs);

    let mut builder = Client::builder().default_headers(headers).user_agent("ci-client/0.1.0");
    if let Some(timeout) = timeout {
      builder = builder.timeout(timeout);
    }
    let client =
      builder.build().map_err(|e| Error::Http(format!("Failed to create HTTP client: {}", e)))?;

    Ok(Self {
      client,
      base_url: config.base_url.trim_end_matches('/').to_string(),
      api_tier: config.api_tier,
      timeout,
    })
  }

  /// Make a GET request to the CoinGecko API
  ///
  /// # Arguments
  ///
  /// * `endpoint` - The endpoint to call
  /// * `segment` - Extra path segment appended after the endpoint path (a coin id)
  /// * `params` - Query parameters for the request
  ///
  /// # Returns
  ///
  /// Returns a `Result` containing the deserialized response or an error.
  /// Transport failures and non-2xx statuses are returned as-is, without retry.
  #[instrument(skip(self, params), fields(endpoint = %endpoint))]
  pub async fn get<T>(
    &self,
    endpoint: Endpoint,
    segment: Option<&str>,
    params: &[(&str, String)],
  ) -> Result<T>
  where
    T: DeserializeOwned,
  {
    let url = self.build_url(endpoint, segment, params)?;
    debug!("Making request to: {}", url);

    let response = self.make_request(url).await?;

    let text = response
      .text()
      .await
      .map_err(|e| Error::Http(format!("Failed to read response body: {}", e)))?;

    debug!("Response body length: {} bytes", text.len());

    serde_json::from_str::<T>(&text).map_err(|e| {
      error!("Failed to parse JSON response: {}", e);
      Error::Parse(format!("Failed to parse response: {}. Response: {}", e, preview(&text, 200)))
    })
  }

  /// Build the full URL for an API request
  fn build_url(
    &self,
    endpoint: Endpoint,
    segment: Option<&str>,
    params: &[(&str, String)],
  ) -> Result<Url> {
    let raw = match segment {
      Some(segment) => format!("{}/{}/{}", self.base_url, endpoint.path(), segment),
      None => format!("{}/{}", self.base_url, endpoint.path()),
    };

    let mut url = Url::parse(&raw).map_err(|e| Error::Http(format!("Invalid URL {}: {}", raw, e)))?;

    if !params.is_empty() {
      let mut query_pairs = url.query_pairs_mut();
      for (key, value) in params {
        query_pairs.append_pair(key, value);
      }
    }

    Ok(url)
  }

  /// Make the actual HTTP request
  async fn make_request(&self, url: Url) -> Result<Response> {
    let response = self
      .client
      .get(url)
      .send()
      .await
      .map_err(|e| Error::Http(format!("Request failed: {}", e)))?;

    let status = response.status();

    if status.is_success() {
      debug!("Request successful with status: {}", status);
      return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = api_error_message(&body)
      .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_string());

    if status.as_u16() == 429 {
      warn!("CoinGecko rate limit hit: {}", message);
    } else {
      error!("Request failed with status {}: {}", status, message);
    }

    Err(Error::Status { status: status.as_u16(), message })
  }

  /// Get the base URL being used
  pub fn base_url(&self) -> &str {
    &self.base_url
  }

  pub fn api_tier(&self) -> ApiTier {
    self.api_tier
  }

  /// Get request timeout duration
  pub fn timeout(&self) -> Option<Duration> {
    self.timeout
  }
}

impl std::fmt::Debug for Transport {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Transport")
      .field("base_url", &self.base_url)
      .field("api_tier", &self.api_tier)
      .field("timeout", &self.timeout)
      .finish()
  }
}

/// Pull the error text out of a CoinGecko error body.
///
/// Handles both `{"error": "..."}` and
/// `{"status": {"error_code": 429, "error_message": "..."}}`.
fn api_error_message(body: &str) -> Option<String> {
  let value: serde_json::Value = serde_json::from_str(body).ok()?;

  if let Some(message) = value.get("error").and_then(|e| e.as_str()) {
    return Some(message.to_string());
  }

  value
    .get("status")
    .and_then(|s| s.get("error_message"))
    .and_then(|m| m.as_str())
    .map(|m| m.to_string())
}

fn preview(text: &str, max_chars: usize) -> String {
  text.chars().take(max_chars).collect()
}
