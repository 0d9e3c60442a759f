pub mod config;
pub mod error;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use config::{ApiTier, Config};
pub use error::{Error, Result};

/// The CoinGecko v3 endpoints consumed by the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
  /// Full coin catalogue (`id`, `symbol`, `name`)
  CoinsList,
  /// First page of coins ordered by market cap
  CoinsMarkets,
  /// Spot price snapshot for one or more ids
  SimplePrice,
  /// Single-coin details; the coin id is appended as a path segment
  CoinDetails,
}

impl Endpoint {
  /// Path relative to the API base URL, without a leading slash.
  pub fn path(&self) -> &'static str {
    match self {
      Endpoint::CoinsList => "coins/list",
      Endpoint::CoinsMarkets => "coins/markets",
      Endpoint::SimplePrice => "simple/price",
      Endpoint::CoinDetails => "coins",
    }
  }
}

impl std::fmt::Display for Endpoint {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Endpoint::CoinsList => write!(f, "COINS_LIST"),
      Endpoint::CoinsMarkets => write!(f, "COINS_MARKETS"),
      Endpoint::SimplePrice => write!(f, "SIMPLE_PRICE"),
      Endpoint::CoinDetails => write!(f, "COIN_DETAILS"),
    }
  }
}

/// Base URL for the public (demo) CoinGecko API
pub const COINGECKO_DEMO_BASE_URL: &str = "https://api.coingecko.com/api/v3";

/// Base URL for the CoinGecko Pro API
pub const COINGECKO_PRO_BASE_URL: &str = "https://pro-api.coingecko.com/api/v3";

/// API rate limits
pub const DEFAULT_RATE_LIMIT: u32 = 30; // requests per minute, demo tier
pub const PRO_RATE_LIMIT: u32 = 500; // requests per minute

/// Coin list TTL in hours
pub const DEFAULT_CACHE_TTL_HOURS: u64 = 24;

/// Upper bound on results returned by a single search
pub const DEFAULT_SEARCH_LIMIT: usize = 10;

/// Idle window before a typed query is searched
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;

/// Number of coins requested from `/coins/markets` for market cap enrichment
pub const MARKETS_PAGE_SIZE: u32 = 250;
