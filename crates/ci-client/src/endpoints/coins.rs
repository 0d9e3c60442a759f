use super::{impl_endpoint_base, EndpointBase, SharedRateLimiter};
use crate::transport::Transport;
use ci_core::{Endpoint, Result};
use ci_models::{CoinDetails, CoinListItem, MarketCoin};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Catalogue endpoints: `/coins/list`, `/coins/markets` and `/coins/{id}`
pub struct CoinsEndpoints {
  transport: Arc<Transport>,
  rate_limiter: SharedRateLimiter,
}

impl CoinsEndpoints {
  /// Create a new coins endpoints instance
  pub fn new(transport: Arc<Transport>, rate_limiter: SharedRateLimiter) -> Self {
    Self { transport, rate_limiter }
  }

  /// Fetch the complete coin universe. One request, no pagination.
  ///
  /// Items come back without a market cap.
  #[instrument(skip(self))]
  pub async fn list(&self) -> Result<Vec<CoinListItem>> {
    self.wait_for_rate_limit().await?;

    let coins: Vec<CoinListItem> = self.transport.get(Endpoint::CoinsList, None, &[]).await?;
    debug!("Fetched {} coins from /coins/list", coins.len());
    Ok(coins)
  }

  /// Fetch the first page of coins ordered by USD market cap.
  ///
  /// # Arguments
  ///
  /// * `per_page` - Page size (CoinGecko caps this at 250)
  #[instrument(skip(self))]
  pub async fn markets(&self, per_page: u32) -> Result<Vec<MarketCoin>> {
    self.wait_for_rate_limit().await?;

    let params = [
      ("vs_currency", "usd".to_string()),
      ("order", "market_cap_desc".to_string()),
      ("per_page", per_page.to_string()),
      ("page", "1".to_string()),
    ];

    let coins: Vec<MarketCoin> = self.transport.get(Endpoint::CoinsMarkets, None, &params).await?;
    debug!("Fetched {} ranked coins from /coins/markets", coins.len());
    Ok(coins)
  }

  /// Fetch community, developer and sentiment data for one coin
  ///
  /// # Examples
  ///
  /// ```ignore
  /// let details = client.coins().details("bitcoin").await?;
  /// println!("{:?}", details.sentiment_votes_up_percentage);
  /// ```
  #[instrument(skip(self))]
  pub async fn details(&self, coin_id: &str) -> Result<CoinDetails> {
    self.wait_for_rate_limit().await?;

    let params = [
      ("localization", "false".to_string()),
      ("tickers", "false".to_string()),
      ("market_data", "false".to_string()),
      ("community_data", "true".to_string()),
      ("developer_data", "true".to_string()),
      ("sparkline", "false".to_string()),
    ];

    self.transport.get(Endpoint::CoinDetails, Some(coin_id), &params).await
  }
}

impl_endpoint_base!(CoinsEndpoints);
