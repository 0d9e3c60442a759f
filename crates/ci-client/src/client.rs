/*
 *
 *
 *
 *
 * MIT License
 * Copyright (c) 2025. Dwight J. Browne
 * dwight[-at-]dwightjbrowne[-dot-]com
 *
 *
 * Permission is hereby granted, free of charge, to any person obtaining a copy
 * of this software and associated documentation files (the "Software"), to deal
 * in the Software without restriction, including without limitation the rights
 * to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
 * copies of the Software, and to permit persons to whom the Software is
 * furnished to do so, subject to the following conditions:
 *
 * The above copyright notice and this permission notice shall be included in all
 * copies or substantial portions of the Software.
 *
 * THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
 * IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
 * FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
 * AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
 * LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
 * OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
 * SOFTWARE.
 */

use crate::endpoints::{coins::CoinsEndpoints, simple::SimpleEndpoints, SharedRateLimiter};
use crate::transport::Transport;
use ci_core::{Config, Result};
use governor::{Quota, RateLimiter};
use std::num::NonZeroU32;
use std::sync::Arc;

/// Main CoinGecko API client
///
/// Provides access to the endpoints the dashboard consumes through organized
/// endpoint groups. Handles authentication and client-side rate limiting.
///
/// # Examples
///
/// ```ignore
/// use ci_client::CoinGeckoClient;
/// use ci_core::Config;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = Config::from_env()?;
///     let client = CoinGeckoClient::new(config)?;
///
///     let snapshot = client.simple().price("bitcoin").await?;
///     println!("{:?}", snapshot.quote("bitcoin"));
///
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct CoinGeckoClient {
  rate_limiter: SharedRateLimiter,
  transport: Arc<Transport>,
}

impl CoinGeckoClient {
  /// Create a new CoinGecko API client
  ///
  /// # Errors
  ///
  /// Returns an error if the API key is not a valid header value or the HTTP
  /// client cannot be created.
  pub fn new(config: Config) -> Result<Self> {
    // Ensure rate_limit is non-zero, fallback to default if invalid
    let rate_limit_value = NonZeroU32::new(config.rate_limit)
      .or(NonZeroU32::new(ci_core::DEFAULT_RATE_LIMIT))
      .unwrap_or(NonZeroU32::MIN);
    let quota = Quota::per_minute(rate_limit_value);
    let rate_limiter = Arc::new(RateLimiter::direct(quota));

    let transport = Arc::new(Transport::new(&config)?);

    Ok(Self { transport, rate_limiter })
  }

  /// Create a new client with custom rate limiting
  pub fn with_rate_limiter(config: Config, rate_limiter: SharedRateLimiter) -> Result<Self> {
    Ok(Self { transport: Arc::new(Transport::new(&config)?), rate_limiter })
  }

  /// Get access to the catalogue endpoints (`/coins/...`)
  pub fn coins(&self) -> CoinsEndpoints {
    CoinsEndpoints::new(self.transport.clone(), self.rate_limiter.clone())
  }

  /// Get access to the `/simple/price` endpoint
  pub fn simple(&self) -> SimpleEndpoints {
    SimpleEndpoints::new(self.transport.clone(), self.rate_limiter.clone())
  }

  /// Transport used by this client
  pub fn transport(&self) -> &Arc<Transport> {
    &self.transport
  }
}

impl std::fmt::Debug for CoinGeckoClient {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("CoinGeckoClient")
      .field("transport", &self.transport)
      .field("rate_limiter", &"RateLimiter")
      .finish()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use ci_core::ApiTier;

  #[test]
  fn test_client_creation() {
    let config = Config::default_with_key("test_key".to_string());

    let client = CoinGeckoClient::new(config).expect("Failed to create client");
    assert_eq!(client.transport().base_url(), ci_core::COINGECKO_DEMO_BASE_URL);
    assert_eq!(client.transport().api_tier(), ApiTier::Demo);
  }

  #[test]
  fn test_zero_rate_limit_falls_back_to_default() {
    let mut config = Config::default_with_key("test_key".to_string());
    config.rate_limit = 0;

    let _client = CoinGeckoClient::new(config).expect("Failed to create client");
  }
}
