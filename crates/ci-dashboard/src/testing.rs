//! Scripted [`MarketDataSource`] for unit tests.

use crate::source::MarketDataSource;
use async_trait::async_trait;
use ci_core::{Error, Result};
use ci_models::{CoinDetails, CoinListItem, CoinSnapshot, MarketCoin, SimplePriceQuote};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

#[derive(Default)]
pub(crate) struct FakeSource {
  pub coins: Mutex<Vec<CoinListItem>>,
  pub markets: Mutex<Vec<MarketCoin>>,
  pub quotes: Mutex<HashMap<String, SimplePriceQuote>>,
  pub delays: Mutex<HashMap<String, Duration>>,
  pub list_delay: Mutex<Option<Duration>>,
  pub details: Mutex<Option<CoinDetails>>,
  pub fail_list: AtomicBool,
  pub fail_snapshot: AtomicBool,
  pub fail_details: AtomicBool,
  pub list_calls: AtomicUsize,
  pub snapshot_calls: AtomicUsize,
  pub details_calls: AtomicUsize,
}

impl FakeSource {
  pub fn with_catalogue(coins: Vec<CoinListItem>, markets: Vec<MarketCoin>) -> Self {
    let source = Self::default();
    *source.coins.lock().unwrap() = coins;
    *source.markets.lock().unwrap() = markets;
    source
  }

  pub fn set_quote(&self, coin_id: &str, quote: SimplePriceQuote) {
    self.quotes.lock().unwrap().insert(coin_id.to_string(), quote);
  }

  pub fn set_delay(&self, coin_id: &str, delay: Duration) {
    self.delays.lock().unwrap().insert(coin_id.to_string(), delay);
  }

  pub fn list_calls(&self) -> usize {
    self.list_calls.load(Ordering::SeqCst)
  }
}

pub(crate) fn quote(usd: f64, market_cap: f64, volume: f64) -> SimplePriceQuote {
  SimplePriceQuote {
    usd: Some(usd),
    usd_market_cap: Some(market_cap),
    usd_24h_vol: Some(volume),
    ..Default::default()
  }
}

pub(crate) fn market(id: &str, market_cap: Option<f64>) -> MarketCoin {
  MarketCoin {
    id: id.to_string(),
    symbol: String::new(),
    name: String::new(),
    market_cap,
    market_cap_rank: None,
  }
}

fn unavailable() -> Error {
  Error::Http("Request failed: connection refused".to_string())
}

#[async_trait]
impl MarketDataSource for FakeSource {
  async fn fetch_coin_list(&self) -> Result<Vec<CoinListItem>> {
    self.list_calls.fetch_add(1, Ordering::SeqCst);

    let delay = *self.list_delay.lock().unwrap();
    if let Some(delay) = delay {
      tokio::time::sleep(delay).await;
    }

    if self.fail_list.load(Ordering::SeqCst) {
      return Err(unavailable());
    }
    Ok(self.coins.lock().unwrap().clone())
  }

  async fn fetch_market_caps(&self) -> Result<Vec<MarketCoin>> {
    if self.fail_list.load(Ordering::SeqCst) {
      return Err(unavailable());
    }
    Ok(self.markets.lock().unwrap().clone())
  }

  async fn fetch_coin_snapshot(&self, coin_id: &str) -> Result<CoinSnapshot> {
    self.snapshot_calls.fetch_add(1, Ordering::SeqCst);

    let delay = self.delays.lock().unwrap().get(coin_id).copied();
    if let Some(delay) = delay {
      tokio::time::sleep(delay).await;
    }

    if self.fail_snapshot.load(Ordering::SeqCst) {
      return Err(unavailable());
    }

    let mut snapshot = CoinSnapshot::default();
    if let Some(quote) = self.quotes.lock().unwrap().get(coin_id) {
      snapshot.insert(coin_id, quote.clone());
    }
    Ok(snapshot)
  }

  async fn fetch_coin_details(&self, _coin_id: &str) -> Result<CoinDetails> {
    self.details_calls.fetch_add(1, Ordering::SeqCst);
    if self.fail_details.load(Ordering::SeqCst) {
      return Err(Error::Status { status: 404, message: "coin not found".to_string() });
    }
    Ok(self.details.lock().unwrap().clone().unwrap_or_default())
  }
}
