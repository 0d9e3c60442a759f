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

//! Coin list cache.
//!
//! Holds the full CoinGecko catalogue in memory, enriched with market caps
//! from the first `/coins/markets` page, and mirrors it to a
//! [`KeyValueStore`] under [`COIN_LIST_KEY`].
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ci_dashboard::{CoinListCache, FileStore};
//!
//! let cache = CoinListCache::new(source, Arc::new(FileStore::new(".crypto-intel")));
//! cache.hydrate().await;
//!
//! // Refreshes first when empty or older than the TTL
//! let coins = cache.get_coin_list().await;
//! ```

use crate::clock::{Clock, SystemClock};
use crate::error::StoreResult;
use crate::source::MarketDataSource;
use crate::store::KeyValueStore;
use chrono::{DateTime, Utc};
use ci_core::{Config, Result};
use ci_models::{CacheEnvelope, CoinListItem, MarketCoin};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, error, info, instrument, warn};

/// Store key holding the persisted envelope
pub const COIN_LIST_KEY: &str = "coinList";

/// Freshness of the in-memory catalogue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheState {
  /// Nothing loaded yet
  Empty,
  /// Loaded and younger than the TTL
  Fresh,
  /// Loaded but at least one TTL old
  Stale,
}

#[derive(Debug, Default)]
struct Inner {
  coins: Arc<Vec<CoinListItem>>,
  /// Epoch millis of the data in `coins`; 0 when never refreshed
  last_update: i64,
}

/// In-memory and persisted coin catalogue with lazy TTL refresh.
///
/// All access is serialized through one async mutex, so concurrent callers
/// hitting a stale cache trigger a single refresh.
pub struct CoinListCache {
  source: Arc<dyn MarketDataSource>,
  store: Arc<dyn KeyValueStore>,
  clock: Arc<dyn Clock>,
  ttl: Duration,
  inner: Mutex<Inner>,
}

impl CoinListCache {
  pub fn new(source: Arc<dyn MarketDataSource>, store: Arc<dyn KeyValueStore>) -> Self {
    Self {
      source,
      store,
      clock: Arc::new(SystemClock),
      ttl: Duration::from_secs(ci_core::DEFAULT_CACHE_TTL_HOURS * 3600),
      inner: Mutex::new(Inner::default()),
    }
  }

  pub fn from_config(
    source: Arc<dyn MarketDataSource>,
    store: Arc<dyn KeyValueStore>,
    config: &Config,
  ) -> Self {
    let ttl = Duration::from_secs(config.cache_ttl_hours.saturating_mul(3600));
    Self::new(source, store).with_ttl(ttl)
  }

  /// Builder: set the time source
  pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
    self.clock = clock;
    self
  }

  /// Builder: set the time-to-live
  pub fn with_ttl(mut self, ttl: Duration) -> Self {
    self.ttl = ttl;
    self
  }

  pub fn ttl(&self) -> Duration {
    self.ttl
  }

  /// Current catalogue, refreshing first when empty or stale.
  ///
  /// Never fails: on a failed refresh the last good list (or the persisted
  /// one, or nothing) is returned.
  #[instrument(skip(self))]
  pub async fn get_coin_list(&self) -> Arc<Vec<CoinListItem>> {
    let mut inner = self.inner.lock().await;

    if self.state_of(&inner) != CacheState::Fresh {
      if let Err(e) = self.refresh_locked(&mut inner).await {
        warn!("Serving {} cached coins after failed refresh: {}", inner.coins.len(), e);
      }
    } else {
      debug!("📦 Coin list cache hit: {} coins", inner.coins.len());
    }

    inner.coins.clone()
  }

  /// Refresh regardless of age. Returns the number of coins loaded.
  ///
  /// Failure handling is the same as for a lazy refresh; the error is
  /// returned as well.
  #[instrument(skip(self))]
  pub async fn refresh(&self) -> Result<usize> {
    let mut inner = self.inner.lock().await;
    self.refresh_locked(&mut inner).await
  }

  /// Load the persisted envelope into an empty cache without touching the
  /// network. Returns the number of coins loaded.
  pub async fn hydrate(&self) -> usize {
    let mut inner = self.inner.lock().await;
    if !inner.coins.is_empty() {
      return 0;
    }
    self.restore_locked(&mut inner).await
  }

  pub async fn state(&self) -> CacheState {
    let inner = self.inner.lock().await;
    self.state_of(&inner)
  }

  /// Timestamp of the data currently served, if any refresh ever succeeded
  pub async fn last_update(&self) -> Option<DateTime<Utc>> {
    let last_update = self.inner.lock().await.last_update;
    if last_update == 0 {
      return None;
    }
    DateTime::from_timestamp_millis(last_update)
  }

  /// Number of coins currently held in memory
  pub async fn len(&self) -> usize {
    self.inner.lock().await.coins.len()
  }

  pub async fn is_empty(&self) -> bool {
    self.len().await == 0
  }

  fn state_of(&self, inner: &Inner) -> CacheState {
    if inner.coins.is_empty() {
      return CacheState::Empty;
    }

    let age = self.clock.now_millis().saturating_sub(inner.last_update);
    let ttl = i64::try_from(self.ttl.as_millis()).unwrap_or(i64::MAX);
    if age >= ttl {
      CacheState::Stale
    } else {
      CacheState::Fresh
    }
  }

  async fn refresh_locked(&self, inner: &mut Inner) -> Result<usize> {
    info!("🌐 Refreshing coin list from CoinGecko");

    match self.fetch_merged().await {
      Ok(coins) => {
        let count = coins.len();
        inner.coins = Arc::new(coins);
        inner.last_update = self.clock.now_millis();
        info!("Loaded {} coins into cache", count);

        self.persist(inner).await;
        Ok(count)
      }
      Err(e) => {
        error!("Failed to fetch coin list: {}", e);
        if inner.coins.is_empty() {
          self.restore_locked(inner).await;
        }
        Err(e)
      }
    }
  }

  async fn fetch_merged(&self) -> Result<Vec<CoinListItem>> {
    let (coins, markets) =
      futures::future::try_join(self.source.fetch_coin_list(), self.source.fetch_market_caps())
        .await?;

    debug!("Merging {} coins with {} market caps", coins.len(), markets.len());
    Ok(merge_market_caps(coins, &markets))
  }

  async fn persist(&self, inner: &Inner) {
    match self.write_envelope(inner).await {
      Ok(count) => info!("💾 Persisted {} coins", count),
      Err(e) => warn!("❌ Failed to persist coin list: {}", e),
    }
  }

  async fn write_envelope(&self, inner: &Inner) -> StoreResult<usize> {
    let envelope = CacheEnvelope::new(inner.coins.as_ref().clone(), inner.last_update);
    let json = serde_json::to_string(&envelope)?;
    self.store.set(COIN_LIST_KEY, &json).await?;
    Ok(envelope.coins.len())
  }

  async fn read_envelope(&self) -> StoreResult<Option<CacheEnvelope>> {
    match self.store.get(COIN_LIST_KEY).await? {
      Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
      None => Ok(None),
    }
  }

  async fn restore_locked(&self, inner: &mut Inner) -> usize {
    match self.read_envelope().await {
      Ok(Some(envelope)) if !envelope.is_empty() => {
        let count = envelope.coins.len();
        inner.coins = Arc::new(envelope.coins);
        inner.last_update = envelope.last_update;
        info!("📦 Restored {} coins from persisted cache", count);
        count
      }
      Ok(Some(_)) => 0,
      Ok(None) => {
        debug!("No persisted coin list");
        0
      }
      Err(e) => {
        warn!("Ignoring unreadable persisted coin list: {}", e);
        0
      }
    }
  }
}

/// Attach market caps to catalogue entries by id.
///
/// Duplicate ids keep their first occurrence. Coins outside the market page,
/// or with a null upstream market cap, get 0.
pub fn merge_market_caps(coins: Vec<CoinListItem>, markets: &[MarketCoin]) -> Vec<CoinListItem> {
  let caps: HashMap<&str, f64> = markets
    .iter()
    .filter_map(|m| m.market_cap.map(|cap| (m.id.as_str(), cap)))
    .collect();

  let mut seen = HashSet::with_capacity(coins.len());
  let mut merged = Vec::with_capacity(coins.len());

  for coin in coins {
    if !seen.insert(coin.id.clone()) {
      debug!("Dropping duplicate coin id {}", coin.id);
      continue;
    }
    let cap = caps.get(coin.id.as_str()).copied().unwrap_or(0.0);
    merged.push(coin.with_market_cap(cap));
  }

  merged
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::clock::ManualClock;
  use crate::error::StoreError;
  use crate::store::MemoryStore;
  use crate::testing::{market, FakeSource};
  use async_trait::async_trait;
  use std::sync::atomic::Ordering;

  const HOUR: Duration = Duration::from_secs(3600);
  const START: i64 = 1_700_000_000_000;

  fn catalogue() -> FakeSource {
    FakeSource::with_catalogue(
      vec![
        CoinListItem::new("bitcoin", "btc", "Bitcoin"),
        CoinListItem::new("ethereum", "eth", "Ethereum"),
        CoinListItem::new("obscure", "obs", "Obscure"),
      ],
      vec![market("bitcoin", Some(1.3e12)), market("ethereum", Some(4.0e11))],
    )
  }

  struct Harness {
    source: Arc<FakeSource>,
    store: Arc<MemoryStore>,
    clock: Arc<ManualClock>,
    cache: CoinListCache,
  }

  fn harness(source: FakeSource) -> Harness {
    let source = Arc::new(source);
    let store = Arc::new(MemoryStore::new());
    let clock = Arc::new(ManualClock::new(START));
    let cache = CoinListCache::new(source.clone(), store.clone()).with_clock(clock.clone());
    Harness { source, store, clock, cache }
  }

  struct BrokenStore;

  #[async_trait]
  impl KeyValueStore for BrokenStore {
    async fn get(&self, _key: &str) -> StoreResult<Option<String>> {
      Err(StoreError::IoError("unreadable".to_string()))
    }

    async fn set(&self, _key: &str, _value: &str) -> StoreResult<()> {
      Err(StoreError::IoError("read-only filesystem".to_string()))
    }
  }

  #[test]
  fn test_merge_defaults_and_dedupes() {
    let coins = vec![
      CoinListItem::new("bitcoin", "btc", "Bitcoin"),
      CoinListItem::new("nullcap", "nul", "Null Cap"),
      CoinListItem::new("bitcoin", "btc2", "Bitcoin Copy"),
      CoinListItem::new("tiny", "tny", "Tiny"),
    ];
    let markets = vec![market("bitcoin", Some(1.0e12)), market("nullcap", None)];

    let merged = merge_market_caps(coins, &markets);

    assert_eq!(merged.len(), 3);
    assert_eq!(merged[0].symbol, "btc");
    assert_eq!(merged[0].market_cap, Some(1.0e12));
    assert_eq!(merged[1].market_cap, Some(0.0));
    assert_eq!(merged[2].market_cap, Some(0.0));
  }

  #[tokio::test]
  async fn test_first_access_refreshes_and_persists() {
    let h = harness(catalogue());
    assert_eq!(h.cache.state().await, CacheState::Empty);

    let coins = h.cache.get_coin_list().await;

    assert_eq!(coins.len(), 3);
    assert_eq!(coins[0].market_cap, Some(1.3e12));
    assert_eq!(h.source.list_calls(), 1);
    assert_eq!(h.cache.state().await, CacheState::Fresh);
    assert_eq!(h.cache.last_update().await.map(|t| t.timestamp_millis()), Some(START));

    let raw = h.store.get(COIN_LIST_KEY).await.unwrap().unwrap();
    let envelope: CacheEnvelope = serde_json::from_str(&raw).unwrap();
    assert_eq!(envelope.last_update, START);
    assert_eq!(envelope.coins.len(), 3);
  }

  #[tokio::test]
  async fn test_access_within_ttl_does_not_fetch() {
    let h = harness(catalogue());
    h.cache.get_coin_list().await;

    h.clock.advance(23 * HOUR);
    h.cache.get_coin_list().await;

    assert_eq!(h.source.list_calls(), 1);
  }

  #[tokio::test]
  async fn test_access_after_ttl_refreshes_once() {
    let h = harness(catalogue());
    h.cache.get_coin_list().await;

    h.clock.advance(24 * HOUR);
    assert_eq!(h.cache.state().await, CacheState::Stale);

    h.cache.get_coin_list().await;
    h.cache.get_coin_list().await;

    assert_eq!(h.source.list_calls(), 2);
    assert_eq!(
      h.cache.last_update().await.map(|t| t.timestamp_millis()),
      Some(START + 24 * 3_600_000)
    );
  }

  #[tokio::test]
  async fn test_concurrent_stale_access_refreshes_once() {
    let h = harness(catalogue());

    let (a, b, c) =
      tokio::join!(h.cache.get_coin_list(), h.cache.get_coin_list(), h.cache.get_coin_list());

    assert_eq!(h.source.list_calls(), 1);
    assert_eq!(a.len(), 3);
    assert!(Arc::ptr_eq(&a, &b) && Arc::ptr_eq(&b, &c));
  }

  #[tokio::test]
  async fn test_failed_refresh_keeps_memory_and_timestamp() {
    let h = harness(catalogue());
    h.cache.get_coin_list().await;

    h.clock.advance(25 * HOUR);
    h.source.fail_list.store(true, Ordering::SeqCst);

    let coins = h.cache.get_coin_list().await;
    assert_eq!(coins.len(), 3);
    assert_eq!(h.cache.last_update().await.map(|t| t.timestamp_millis()), Some(START));

    // Still stale, so the next access tries again.
    h.cache.get_coin_list().await;
    assert_eq!(h.source.list_calls(), 3);
  }

  #[tokio::test]
  async fn test_failed_refresh_with_empty_memory_restores_persisted() {
    let source = catalogue();
    source.fail_list.store(true, Ordering::SeqCst);
    let h = harness(source);

    let envelope = CacheEnvelope::new(vec![CoinListItem::new("dogecoin", "doge", "Dogecoin")], 42);
    h.store.set(COIN_LIST_KEY, &serde_json::to_string(&envelope).unwrap()).await.unwrap();

    let coins = h.cache.get_coin_list().await;

    assert_eq!(coins.len(), 1);
    assert_eq!(coins[0].id, "dogecoin");
    assert_eq!(h.cache.last_update().await.map(|t| t.timestamp_millis()), Some(42));
  }

  #[tokio::test]
  async fn test_failed_refresh_without_anything_yields_empty() {
    let source = catalogue();
    source.fail_list.store(true, Ordering::SeqCst);
    let h = harness(source);

    assert!(h.cache.get_coin_list().await.is_empty());
    assert!(h.cache.refresh().await.is_err());
    assert_eq!(h.cache.last_update().await, None);
  }

  #[tokio::test]
  async fn test_persistence_failure_does_not_fail_access() {
    let source = Arc::new(catalogue());
    let cache = CoinListCache::new(source.clone(), Arc::new(BrokenStore));

    let coins = cache.get_coin_list().await;
    assert_eq!(coins.len(), 3);
    assert_eq!(cache.hydrate().await, 0);

    source.fail_list.store(true, Ordering::SeqCst);
    assert!(cache.refresh().await.is_err());
    assert_eq!(cache.len().await, 3);
  }

  #[tokio::test]
  async fn test_explicit_refresh_ignores_age() {
    let h = harness(catalogue());
    h.cache.get_coin_list().await;

    h.clock.advance(HOUR);
    assert_eq!(h.cache.refresh().await.unwrap(), 3);
    assert_eq!(h.source.list_calls(), 2);
  }

  #[tokio::test]
  async fn test_hydrate_suppresses_fetch_when_fresh() {
    let h = harness(catalogue());
    let envelope = CacheEnvelope::new(
      vec![CoinListItem::new("bitcoin", "btc", "Bitcoin").with_market_cap(1.0)],
      START - 3_600_000,
    );
    h.store.set(COIN_LIST_KEY, &serde_json::to_string(&envelope).unwrap()).await.unwrap();

    assert_eq!(h.cache.hydrate().await, 1);
    assert_eq!(h.cache.state().await, CacheState::Fresh);

    let coins = h.cache.get_coin_list().await;
    assert_eq!(coins.len(), 1);
    assert_eq!(h.source.list_calls(), 0);
  }

  #[tokio::test]
  async fn test_hydrate_ignores_corrupt_envelope() {
    let h = harness(catalogue());
    h.store.set(COIN_LIST_KEY, "{not json").await.unwrap();

    assert_eq!(h.cache.hydrate().await, 0);
    assert_eq!(h.cache.state().await, CacheState::Empty);
    assert!(matches!(h.cache.read_envelope().await, Err(StoreError::SerializationError(_))));
  }

  #[tokio::test]
  async fn test_from_config_uses_ttl_hours() {
    let mut config = Config::default_with_key("k".to_string());
    config.cache_ttl_hours = 1;

    let cache =
      CoinListCache::from_config(Arc::new(catalogue()), Arc::new(MemoryStore::new()), &config);
    assert_eq!(cache.ttl(), HOUR);
  }

  #[test]
  fn test_from_config_saturates_huge_ttl() {
    let mut config = Config::default_with_key("k".to_string());
    config.cache_ttl_hours = u64::MAX;

    let cache =
      CoinListCache::from_config(Arc::new(catalogue()), Arc::new(MemoryStore::new()), &config);
    assert_eq!(cache.ttl(), Duration::from_secs(u64::MAX));
  }
}
