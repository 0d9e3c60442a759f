//! The market-data seam between the dashboard and the CoinGecko client.

use async_trait::async_trait;
use ci_client::CoinGeckoClient;
use ci_core::{Result, MARKETS_PAGE_SIZE};
use ci_models::{CoinDetails, CoinListItem, CoinSnapshot, MarketCoin};

/// Trait for market data providers.
///
/// Errors propagate unchanged: implementations do not retry.
#[async_trait]
pub trait MarketDataSource: Send + Sync {
  /// Full coin catalogue, without market caps.
  async fn fetch_coin_list(&self) -> Result<Vec<CoinListItem>>;

  /// Top coins by market cap, used to enrich the catalogue.
  async fn fetch_market_caps(&self) -> Result<Vec<MarketCoin>>;

  /// USD price snapshot for one coin, keyed by id.
  async fn fetch_coin_snapshot(&self, coin_id: &str) -> Result<CoinSnapshot>;

  /// Community, developer and sentiment data for one coin.
  async fn fetch_coin_details(&self, coin_id: &str) -> Result<CoinDetails>;
}

#[async_trait]
impl MarketDataSource for CoinGeckoClient {
  async fn fetch_coin_list(&self) -> Result<Vec<CoinListItem>> {
    self.coins().list().await
  }

  async fn fetch_market_caps(&self) -> Result<Vec<MarketCoin>> {
    self.coins().markets(MARKETS_PAGE_SIZE).await
  }

  async fn fetch_coin_snapshot(&self, coin_id: &str) -> Result<CoinSnapshot> {
    self.simple().price(coin_id).await
  }

  async fn fetch_coin_details(&self, coin_id: &str) -> Result<CoinDetails> {
    self.coins().details(coin_id).await
  }
}
