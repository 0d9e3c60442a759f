use super::{impl_endpoint_base, EndpointBase, SharedRateLimiter};
use crate::transport::Transport;
use ci_core::{Endpoint, Result};
use ci_models::CoinSnapshot;
use std::sync::Arc;
use tracing::instrument;

/// `/simple/price` endpoint
pub struct SimpleEndpoints {
  transport: Arc<Transport>,
  rate_limiter: SharedRateLimiter,
}

impl SimpleEndpoints {
  pub fn new(transport: Arc<Transport>, rate_limiter: SharedRateLimiter) -> Self {
    Self { transport, rate_limiter }
  }

  /// Get the USD price snapshot for a coin
  ///
  /// # Arguments
  ///
  /// * `coin_id` - CoinGecko id (e.g., "bitcoin")
  ///
  /// The response is keyed by id and includes market cap, 24h volume,
  /// 24h change and the last update time.
  #[instrument(skip(self))]
  pub async fn price(&self, coin_id: &str) -> Result<CoinSnapshot> {
    self.wait_for_rate_limit().await?;

    let params = [
      ("ids", coin_id.to_string()),
      ("vs_currencies", "usd".to_string()),
      ("include_market_cap", "true".to_string()),
      ("include_24hr_vol", "true".to_string()),
      ("include_24hr_change", "true".to_string()),
      ("include_last_updated_at", "true".to_string()),
    ];

    self.transport.get(Endpoint::SimplePrice, None, &params).await
  }
}

impl_endpoint_base!(SimpleEndpoints);
