//! # ci-dashboard
//!
//! The non-presentation core of the crypto dashboard.
//!
//! This crate provides:
//! - Trust and sentiment scoring from CoinGecko community/developer data
//! - A TTL coin list cache persisted through a [`KeyValueStore`]
//! - Market-cap ranked coin search with debounced, last-query-wins updates
//! - The coin lookup orchestrator and its idle/loading/success/error state
//!
//! Everything talks to CoinGecko through the [`MarketDataSource`] trait,
//! implemented for [`ci_client::CoinGeckoClient`].

pub mod cache;
pub mod clock;
pub mod debounce;
pub mod error;
pub mod orchestrator;
pub mod scoring;
pub mod search;
pub mod source;
pub mod store;

#[cfg(test)]
mod testing;

// Re-export commonly used types
pub use cache::{merge_market_caps, CacheState, CoinListCache, COIN_LIST_KEY};
pub use clock::{Clock, ManualClock, SystemClock};
pub use debounce::Debouncer;
pub use error::{StoreError, StoreResult};
pub use orchestrator::{CoinDataOrchestrator, CoinDataState, LoadPhase};
pub use search::{search_coins, CoinSearch, SearchController, SearchState};
pub use source::MarketDataSource;
pub use store::{FileStore, KeyValueStore, MemoryStore};

// Prelude for convenient imports
pub mod prelude {
  pub use crate::{
    CacheState, CoinDataOrchestrator, CoinDataState, CoinListCache, CoinSearch, FileStore,
    KeyValueStore, LoadPhase, MarketDataSource, SearchController, SearchState,
  };
}
