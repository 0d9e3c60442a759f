//! Coin search over the cached catalogue.
//!
//! [`search_coins`] is the pure matcher. [`CoinSearch`] binds it to a
//! [`CoinListCache`], and [`SearchController`] adds debouncing and
//! last-query-wins publication for interactive front ends.

use crate::cache::CoinListCache;
use crate::debounce::Debouncer;
use ci_core::Config;
use ci_models::{CoinListItem, MatchType, SearchResult};
use serde::Serialize;
use std::cmp::Ordering as CmpOrdering;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, instrument};

/// Shortest trimmed query that is searched at all
pub const MIN_QUERY_CHARS: usize = 2;

fn is_searchable(query: &str) -> bool {
  query.trim().chars().count() >= MIN_QUERY_CHARS
}

fn match_type(coin: &CoinListItem, needle: &str) -> Option<MatchType> {
  if coin.symbol.to_lowercase().contains(needle) {
    Some(MatchType::Symbol)
  } else if coin.name.to_lowercase().contains(needle) {
    Some(MatchType::Name)
  } else if coin.id.to_lowercase().contains(needle) {
    Some(MatchType::Id)
  } else {
    None
  }
}

/// Positive market cap, or `None` for missing and zero caps.
fn ranked_cap(result: &SearchResult) -> Option<f64> {
  result.market_cap.filter(|cap| *cap > 0.0)
}

fn by_market_cap_desc(a: &SearchResult, b: &SearchResult) -> CmpOrdering {
  match (ranked_cap(a), ranked_cap(b)) {
    (Some(a), Some(b)) => b.partial_cmp(&a).unwrap_or(CmpOrdering::Equal),
    (Some(_), None) => CmpOrdering::Less,
    (None, Some(_)) => CmpOrdering::Greater,
    (None, None) => CmpOrdering::Equal,
  }
}

/// Case-insensitive substring search against symbol, name and id.
///
/// Each coin appears at most once, tagged with the first field that
/// matched in `symbol > name > id` order. Results are sorted by market cap
/// (largest first, missing or zero last; ties keep catalogue order) and then
/// truncated to `limit`.
pub fn search_coins(coins: &[CoinListItem], query: &str, limit: usize) -> Vec<SearchResult> {
  if !is_searchable(query) {
    return Vec::new();
  }
  let needle = query.trim().to_lowercase();

  let mut results: Vec<SearchResult> = coins
    .iter()
    .filter_map(|coin| {
      match_type(coin, &needle).map(|match_type| SearchResult {
        id: coin.id.clone(),
        symbol: coin.symbol.clone(),
        name: coin.name.clone(),
        match_type,
        market_cap: coin.market_cap,
      })
    })
    .collect();

  // sort_by is stable
  results.sort_by(by_market_cap_desc);
  results.truncate(limit);
  results
}

/// Search bound to a coin list cache.
pub struct CoinSearch {
  cache: Arc<CoinListCache>,
  limit: usize,
}

impl CoinSearch {
  pub fn new(cache: Arc<CoinListCache>) -> Self {
    Self { cache, limit: ci_core::DEFAULT_SEARCH_LIMIT }
  }

  pub fn from_config(cache: Arc<CoinListCache>, config: &Config) -> Self {
    Self::new(cache).with_limit(config.search_limit)
  }

  /// Builder: set the result cap
  pub fn with_limit(mut self, limit: usize) -> Self {
    self.limit = limit;
    self
  }

  pub fn cache(&self) -> &Arc<CoinListCache> {
    &self.cache
  }

  /// Search the catalogue, refreshing it first if needed.
  ///
  /// Short queries return immediately without touching the cache. Cache
  /// failures are absorbed by the cache, so this never errors.
  #[instrument(skip(self))]
  pub async fn search(&self, query: &str) -> Vec<SearchResult> {
    if !is_searchable(query) {
      return Vec::new();
    }

    let coins = self.cache.get_coin_list().await;
    let results = search_coins(&coins, query, self.limit);
    debug!("{} results for {:?} among {} coins", results.len(), query, coins.len());
    results
  }
}

/// What a search box shows for the latest query
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchState {
  pub query: String,
  pub results: Vec<SearchResult>,
  #[serde(rename = "isLoading")]
  pub is_loading: bool,
  /// Request token of the run that produced `results`; 0 before any run
  #[serde(skip)]
  pub generation: u64,
}

/// Debounced, last-query-wins search for interactive input.
pub struct SearchController {
  search: Arc<CoinSearch>,
  debouncer: Debouncer,
  token: AtomicU64,
  state: watch::Sender<SearchState>,
}

impl SearchController {
  pub fn new(search: Arc<CoinSearch>, debounce: Duration) -> Self {
    let (state, _) = watch::channel(SearchState::default());
    Self { search, debouncer: Debouncer::new(debounce), token: AtomicU64::new(0), state }
  }

  pub fn from_config(search: Arc<CoinSearch>, config: &Config) -> Self {
    Self::new(search, Duration::from_millis(config.debounce_ms))
  }

  pub fn subscribe(&self) -> watch::Receiver<SearchState> {
    self.state.subscribe()
  }

  pub fn state(&self) -> SearchState {
    self.state.borrow().clone()
  }

  /// Record a keystroke. The search runs once input has been idle for the
  /// debounce window; earlier pending and in-flight searches are dropped.
  pub fn input(self: &Arc<Self>, query: impl Into<String>) {
    let query = query.into();
    self.state.send_modify(|state| {
      self.token.fetch_add(1, Ordering::SeqCst);
      state.query = query.clone();
    });

    let this = Arc::clone(self);
    self.debouncer.schedule(async move {
      this.run(query).await;
    });
  }

  /// Search immediately, publishing the results unless a newer query has
  /// started in the meantime.
  pub async fn run(&self, query: String) {
    let token = self.token.fetch_add(1, Ordering::SeqCst) + 1;

    if !is_searchable(&query) {
      let next = SearchState { query, results: Vec::new(), is_loading: false, generation: token };
      self.publish(token, next);
      return;
    }

    self.state.send_modify(|state| {
      state.query = query.clone();
      state.is_loading = true;
    });

    let results = self.search.search(&query).await;
    self.publish(token, SearchState { query, results, is_loading: false, generation: token });
  }

  /// Drop any pending search and reset to an empty query
  pub fn clear(&self) {
    self.debouncer.cancel();
    let token = self.token.fetch_add(1, Ordering::SeqCst) + 1;
    self.publish(token, SearchState::default());
  }

  fn publish(&self, token: u64, next: SearchState) {
    self.state.send_if_modified(|state| {
      if self.token.load(Ordering::SeqCst) != token {
        debug!("Discarding superseded results for {:?}", next.query);
        return false;
      }
      *state = next;
      true
    });
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::store::MemoryStore;
  use crate::testing::{market, FakeSource};

  fn coin(id: &str, symbol: &str, name: &str, cap: f64) -> CoinListItem {
    CoinListItem::new(id, symbol, name).with_market_cap(cap)
  }

  fn catalogue() -> Vec<CoinListItem> {
    vec![
      coin("bitcoin", "btc", "Bitcoin", 1.3e12),
      coin("bitcoin-cash", "bch", "Bitcoin Cash", 9.0e9),
      coin("wrapped-bitcoin", "wbtc", "Wrapped Bitcoin", 1.0e10),
      coin("btc-2x", "btc2x", "BTC 2x", 0.0),
      coin("ethereum", "eth", "Ethereum", 4.0e11),
    ]
  }

  #[test]
  fn test_short_query_is_empty() {
    assert!(search_coins(&catalogue(), "b", 10).is_empty());
    assert!(search_coins(&catalogue(), "  b ", 10).is_empty());
    assert!(search_coins(&catalogue(), "", 10).is_empty());
  }

  #[test]
  fn test_symbol_match_is_tagged_symbol() {
    let catalogue = vec![CoinListItem::new("bitcoin", "btc", "Bitcoin")];
    let results = search_coins(&catalogue, "btc", 10);

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].id, "bitcoin");
    assert_eq!(results[0].match_type, MatchType::Symbol);
  }

  #[test]
  fn test_match_priority_symbol_name_id() {
    let catalogue = vec![
      CoinListItem::new("solana", "sol", "Solana"),
      CoinListItem::new("wrapped-sol", "wsol", "Wrapped SOL"),
      CoinListItem::new("x-solar", "xsr", "Sunny"),
      CoinListItem::new("abc", "abc", "Solid"),
    ];

    let results = search_coins(&catalogue, "SOL", 10);
    let tags: Vec<(&str, MatchType)> =
      results.iter().map(|r| (r.id.as_str(), r.match_type)).collect();

    assert_eq!(
      tags,
      vec![
        ("solana", MatchType::Symbol),
        ("wrapped-sol", MatchType::Symbol),
        ("x-solar", MatchType::Id),
        ("abc", MatchType::Name),
      ]
    );
  }

  #[test]
  fn test_results_sorted_by_market_cap_with_zero_last() {
    let results = search_coins(&catalogue(), "bitcoin", 10);
    let ids: Vec<&str> = results.iter().map(|r| r.id.as_str()).collect();

    assert_eq!(ids, vec!["bitcoin", "wrapped-bitcoin", "bitcoin-cash"]);

    let results = search_coins(&catalogue(), "btc", 10);
    let ids: Vec<&str> = results.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["bitcoin", "wrapped-bitcoin", "btc-2x"]);
  }

  #[test]
  fn test_ties_keep_catalogue_order() {
    let catalogue = vec![
      CoinListItem::new("moon-a", "mna", "Moon A"),
      coin("moon-b", "mnb", "Moon B", 0.0),
      CoinListItem::new("moon-c", "mnc", "Moon C"),
    ];

    let ids: Vec<String> = search_coins(&catalogue, "moon", 10).into_iter().map(|r| r.id).collect();
    assert_eq!(ids, vec!["moon-a", "moon-b", "moon-c"]);
  }

  #[test]
  fn test_limit_applies_after_sorting() {
    let mut catalogue: Vec<CoinListItem> =
      (0..20).map(|i| coin(&format!("token-{i}"), &format!("tk{i}"), "Token", i as f64)).collect();
    catalogue.push(coin("token-big", "tkb", "Token", 1e9));

    let results = search_coins(&catalogue, "token", 3);

    let ids: Vec<&str> = results.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["token-big", "token-19", "token-18"]);
  }

  fn bound_search(source: FakeSource) -> (Arc<FakeSource>, Arc<CoinSearch>) {
    let source = Arc::new(source);
    let cache = Arc::new(CoinListCache::new(source.clone(), Arc::new(MemoryStore::new())));
    (source, Arc::new(CoinSearch::new(cache)))
  }

  fn fake_catalogue() -> FakeSource {
    FakeSource::with_catalogue(catalogue(), vec![market("bitcoin", Some(1.3e12))])
  }

  #[tokio::test]
  async fn test_short_query_does_not_touch_cache() {
    let (source, search) = bound_search(fake_catalogue());

    assert!(search.search("b").await.is_empty());
    assert_eq!(source.list_calls(), 0);

    assert_eq!(search.search("eth").await[0].id, "ethereum");
    assert_eq!(source.list_calls(), 1);
  }

  #[tokio::test]
  async fn test_cache_failure_yields_empty_results() {
    let source = fake_catalogue();
    source.fail_list.store(true, Ordering::SeqCst);
    let (_, search) = bound_search(source);

    assert!(search.search("bitcoin").await.is_empty());
  }

  #[tokio::test(start_paused = true)]
  async fn test_controller_debounces_typing() {
    let (source, search) = bound_search(fake_catalogue());
    let controller = Arc::new(SearchController::new(search, Duration::from_millis(300)));

    for partial in ["b", "bi", "bit", "bitc"] {
      controller.input(partial);
      tokio::time::sleep(Duration::from_millis(50)).await;
    }
    assert_eq!(controller.state().query, "bitc");
    assert!(controller.state().results.is_empty());

    tokio::time::sleep(Duration::from_millis(400)).await;

    let state = controller.state();
    assert_eq!(state.query, "bitc");
    assert!(!state.is_loading);
    assert_eq!(state.results[0].id, "bitcoin");
    assert_eq!(source.list_calls(), 1);
  }

  #[tokio::test(start_paused = true)]
  async fn test_superseded_run_does_not_publish() {
    let source = fake_catalogue();
    *source.list_delay.lock().unwrap() = Some(Duration::from_millis(500));
    let (_, search) = bound_search(source);
    let controller = SearchController::new(search, Duration::from_millis(300));

    // The slow "bitcoin" search resolves after the newer query published.
    let first = controller.run("bitcoin".to_string());
    let second = async {
      tokio::time::sleep(Duration::from_millis(10)).await;
      controller.run("e".to_string()).await;
    };
    tokio::join!(first, second);

    let state = controller.state();
    assert_eq!(state.query, "e");
    assert!(state.results.is_empty());
    assert!(!state.is_loading);
  }

  #[tokio::test]
  async fn test_clear_resets_state() {
    let (_, search) = bound_search(fake_catalogue());
    let controller = SearchController::new(search, Duration::from_millis(300));

    controller.run("eth".to_string()).await;
    assert!(!controller.state().results.is_empty());

    controller.clear();
    assert_eq!(controller.state(), SearchState::default());
  }

  #[tokio::test(start_paused = true)]
  async fn test_keystroke_discards_in_flight_results() {
    let source = fake_catalogue();
    *source.list_delay.lock().unwrap() = Some(Duration::from_millis(500));
    let (_, search) = bound_search(source);
    let controller = Arc::new(SearchController::new(search, Duration::from_millis(300)));

    let slow = {
      let controller = controller.clone();
      tokio::spawn(async move { controller.run("bitcoin".to_string()).await })
    };
    tokio::time::sleep(Duration::from_millis(300)).await;
    controller.input("ethereum");

    // The slow run finishes at 500ms, before the debounced run starts at 600ms.
    slow.await.unwrap();
    let state = controller.state();
    assert_eq!(state.query, "ethereum");
    assert!(state.results.is_empty());

    tokio::time::sleep(Duration::from_millis(1_000)).await;
    let state = controller.state();
    assert_eq!(state.query, "ethereum");
    assert_eq!(state.results[0].id, "ethereum");
    assert!(!state.is_loading);
  }

  #[tokio::test]
  async fn test_each_completed_run_gets_a_new_generation() {
    let (_, search) = bound_search(fake_catalogue());
    let controller = SearchController::new(search, Duration::from_millis(300));

    controller.run("eth".to_string()).await;
    let first = controller.state().generation;
    controller.run("eth".to_string()).await;
    let second = controller.state().generation;

    assert!(first > 0);
    assert!(second > first);
  }
}
