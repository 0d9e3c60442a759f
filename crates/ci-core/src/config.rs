//! Configuration management for the crypto-intel crates

use crate::error::{Error, Result};
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use url::Url;

/// CoinGecko subscription tier. Decides the auth header and default base URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiTier {
  Demo,
  Pro,
}

impl ApiTier {
  /// Header carrying the API key on every request
  pub fn header_name(&self) -> &'static str {
    match self {
      ApiTier::Demo => "x-cg-demo-api-key",
      ApiTier::Pro => "x-cg-pro-api-key",
    }
  }

  pub fn default_base_url(&self) -> &'static str {
    match self {
      ApiTier::Demo => crate::COINGECKO_DEMO_BASE_URL,
      ApiTier::Pro => crate::COINGECKO_PRO_BASE_URL,
    }
  }

  /// Requests per minute when `CI_RATE_LIMIT` is unset
  pub fn default_rate_limit(&self) -> u32 {
    match self {
      ApiTier::Demo => crate::DEFAULT_RATE_LIMIT,
      ApiTier::Pro => crate::PRO_RATE_LIMIT,
    }
  }
}

impl FromStr for ApiTier {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    match s.trim().to_ascii_lowercase().as_str() {
      "demo" => Ok(ApiTier::Demo),
      "pro" => Ok(ApiTier::Pro),
      other => Err(Error::Config(format!("Invalid CI_API_TIER: {other}"))),
    }
  }
}

/// Main configuration struct for the dashboard
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
  /// CoinGecko API key
  pub api_key: String,

  /// Subscription tier
  pub api_tier: ApiTier,

  /// Base URL for the CoinGecko API
  pub base_url: String,

  /// API rate limit (requests per minute)
  pub rate_limit: u32,

  /// Request timeout in seconds. `None` leaves timeouts to the transport.
  pub timeout_secs: Option<u64>,

  /// Directory holding the persisted coin list
  pub cache_dir: PathBuf,

  /// Coin list TTL in hours
  pub cache_ttl_hours: u64,

  /// Maximum number of search results
  pub search_limit: usize,

  /// Search debounce window in milliseconds
  pub debounce_ms: u64,

  /// Fetch `/coins/{id}` details for trust and sentiment scoring
  pub fetch_details: bool,
}

impl Config {
  /// Load configuration from environment variables
  pub fn from_env() -> Result<Self> {
    dotenv().ok();

    Self::from_lookup(|name| env::var(name).ok())
  }

  /// Build a configuration from an arbitrary variable lookup.
  pub fn from_lookup<F>(lookup: F) -> Result<Self>
  where
    F: Fn(&str) -> Option<String>,
  {
    let api_key = lookup("COINGECKO_API_KEY")
      .filter(|key| !key.trim().is_empty())
      .ok_or_else(|| Error::ApiKey("COINGECKO_API_KEY not set".to_string()))?;

    let api_tier = match lookup("CI_API_TIER") {
      Some(tier) => tier.parse()?,
      None => ApiTier::Demo,
    };

    let base_url = lookup("CI_BASE_URL").unwrap_or_else(|| api_tier.default_base_url().to_string());
    Url::parse(&base_url).map_err(|e| Error::Config(format!("Invalid CI_BASE_URL: {e}")))?;

    let rate_limit = parse_or(&lookup, "CI_RATE_LIMIT", api_tier.default_rate_limit())?;

    let timeout_secs = match lookup("CI_TIMEOUT_SECS") {
      Some(raw) => Some(
        raw.trim().parse().map_err(|_| Error::Config("Invalid CI_TIMEOUT_SECS".to_string()))?,
      ),
      None => None,
    };

    let cache_dir =
      PathBuf::from(lookup("CI_CACHE_DIR").unwrap_or_else(|| ".crypto-intel".to_string()));

    let cache_ttl_hours = parse_or(&lookup, "CI_CACHE_TTL_HOURS", crate::DEFAULT_CACHE_TTL_HOURS)?;
    let search_limit = parse_or(&lookup, "CI_SEARCH_LIMIT", crate::DEFAULT_SEARCH_LIMIT)?;
    let debounce_ms = parse_or(&lookup, "CI_DEBOUNCE_MS", crate::DEFAULT_DEBOUNCE_MS)?;
    let fetch_details = parse_or(&lookup, "CI_FETCH_DETAILS", false)?;

    Ok(Config {
      api_key,
      api_tier,
      base_url,
      rate_limit,
      timeout_secs,
      cache_dir,
      cache_ttl_hours,
      search_limit,
      debounce_ms,
      fetch_details,
    })
  }

  /// Create a config with default values (for testing)
  pub fn default_with_key(api_key: String) -> Self {
    Config {
      api_key,
      api_tier: ApiTier::Demo,
      base_url: crate::COINGECKO_DEMO_BASE_URL.to_string(),
      rate_limit: crate::DEFAULT_RATE_LIMIT,
      timeout_secs: None,
      cache_dir: PathBuf::from(".crypto-intel"),
      cache_ttl_hours: crate::DEFAULT_CACHE_TTL_HOURS,
      search_limit: crate::DEFAULT_SEARCH_LIMIT,
      debounce_ms: crate::DEFAULT_DEBOUNCE_MS,
      fetch_details: false,
    }
  }

  /// Builder: point the client at another base URL (mock servers, proxies)
  pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
    self.base_url = base_url.into();
    self
  }
}

fn parse_or<F, T>(lookup: &F, name: &str, default: T) -> Result<T>
where
  F: Fn(&str) -> Option<String>,
  T: FromStr,
{
  match lookup(name) {
    Some(raw) => raw.trim().parse().map_err(|_| Error::Config(format!("Invalid {name}"))),
    None => Ok(default),
  }
}
