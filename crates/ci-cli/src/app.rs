//! Wiring of the dashboard components for one CLI invocation.

use anyhow::{Context, Result};
use ci_client::CoinGeckoClient;
use ci_core::Config;
use ci_dashboard::{
  CoinDataOrchestrator, CoinListCache, CoinSearch, FileStore, MarketDataSource, SearchController,
};
use std::sync::Arc;
use tracing::debug;

pub struct App {
  pub config: Config,
  pub cache: Arc<CoinListCache>,
  pub search: Arc<CoinSearch>,
  pub orchestrator: Arc<CoinDataOrchestrator>,
}

impl App {
  pub fn from_config(config: Config) -> Result<Self> {
    let client =
      CoinGeckoClient::new(config.clone()).context("Failed to create CoinGecko client")?;
    Ok(Self::with_source(config, Arc::new(client)))
  }

  pub fn with_source(config: Config, source: Arc<dyn MarketDataSource>) -> Self {
    debug!("Coin list store at {}", config.cache_dir.display());
    let store = Arc::new(FileStore::new(config.cache_dir.clone()));

    let cache = Arc::new(CoinListCache::from_config(source.clone(), store, &config));
    let search = Arc::new(CoinSearch::from_config(cache.clone(), &config));
    let orchestrator = Arc::new(CoinDataOrchestrator::from_config(source, &config));

    Self { config, cache, search, orchestrator }
  }

  /// Each invocation is a fresh process, so start from the persisted list.
  pub async fn hydrate(&self) -> usize {
    self.cache.hydrate().await
  }

  pub fn search_controller(&self) -> Arc<SearchController> {
    Arc::new(SearchController::from_config(self.search.clone(), &self.config))
  }
}
