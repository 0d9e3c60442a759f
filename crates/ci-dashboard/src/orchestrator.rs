//! Coin lookups: snapshot fetch, validation, scoring, and the
//! idle/loading/success/error state machine the front end renders.

use crate::scoring;
use crate::source::MarketDataSource;
use ci_core::{Config, Error, Result};
use ci_models::{CoinDetails, MarketData, SimplePriceQuote};
use serde::Serialize;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};

/// Derived view of [`CoinDataState`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadPhase {
  Idle,
  Loading,
  Success,
  Error,
}

impl fmt::Display for LoadPhase {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      LoadPhase::Idle => write!(f, "idle"),
      LoadPhase::Loading => write!(f, "loading"),
      LoadPhase::Success => write!(f, "success"),
      LoadPhase::Error => write!(f, "error"),
    }
  }
}

/// What the presentation layer renders for the selected coin.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CoinDataState {
  /// The current selection
  #[serde(rename = "coinId")]
  pub coin_id: Option<String>,
  pub data: Option<MarketData>,
  #[serde(rename = "isLoading")]
  pub is_loading: bool,
  pub error: Option<String>,
}

impl CoinDataState {
  pub fn phase(&self) -> LoadPhase {
    if self.is_loading {
      LoadPhase::Loading
    } else if self.error.is_some() {
      LoadPhase::Error
    } else if self.data.is_some() {
      LoadPhase::Success
    } else {
      LoadPhase::Idle
    }
  }
}

/// Drives lookups for one "currently selected coin".
///
/// Each [`select`](CoinDataOrchestrator::select) takes a fresh request
/// token; a lookup only publishes its outcome while its token is still the
/// latest, so a slow response for an earlier selection is dropped.
pub struct CoinDataOrchestrator {
  source: Arc<dyn MarketDataSource>,
  fetch_details: bool,
  token: AtomicU64,
  state: watch::Sender<CoinDataState>,
}

impl CoinDataOrchestrator {
  pub fn new(source: Arc<dyn MarketDataSource>) -> Self {
    let (state, _) = watch::channel(CoinDataState::default());
    Self { source, fetch_details: false, token: AtomicU64::new(0), state }
  }

  pub fn from_config(source: Arc<dyn MarketDataSource>, config: &Config) -> Self {
    Self::new(source).with_details(config.fetch_details)
  }

  /// Builder: also fetch `/coins/{id}` details for scoring
  pub fn with_details(mut self, fetch_details: bool) -> Self {
    self.fetch_details = fetch_details;
    self
  }

  pub fn subscribe(&self) -> watch::Receiver<CoinDataState> {
    self.state.subscribe()
  }

  pub fn state(&self) -> CoinDataState {
    self.state.borrow().clone()
  }

  /// Change the selection and run the lookup to completion.
  ///
  /// `None` returns to idle immediately and supersedes any lookup in
  /// flight.
  #[instrument(skip(self))]
  pub async fn select(&self, coin_id: Option<String>) {
    let Some(coin_id) = coin_id else {
      self.state.send_modify(|state| {
        self.token.fetch_add(1, Ordering::SeqCst);
        *state = CoinDataState::default();
      });
      debug!("Selection cleared");
      return;
    };

    let mut token = 0;
    self.state.send_modify(|state| {
      token = self.token.fetch_add(1, Ordering::SeqCst) + 1;
      state.coin_id = Some(coin_id.clone());
      state.is_loading = true;
      state.error = None;
    });

    let outcome = self.lookup(&coin_id).await;

    let published = self.state.send_if_modified(|state| {
      if self.token.load(Ordering::SeqCst) != token {
        return false;
      }
      state.is_loading = false;
      match &outcome {
        Ok(data) => {
          state.data = Some(data.clone());
          state.error = None;
        }
        Err(e) => {
          state.data = None;
          state.error = Some(e.to_string());
        }
      }
      true
    });

    if !published {
      debug!("Discarding superseded lookup for {}", coin_id);
    }
  }

  /// Fetch and score one coin without touching the published state.
  pub async fn lookup(&self, coin_id: &str) -> Result<MarketData> {
    let snapshot = self.source.fetch_coin_snapshot(coin_id).await?;
    let quote = snapshot.quote(coin_id).ok_or(Error::InvalidMarketData)?;
    let required = RequiredFields::from_quote(quote)?;

    let details = if self.fetch_details { self.details(coin_id).await } else { None };

    let data = build_market_data(coin_id, quote, required, details.as_ref());
    info!(
      "Loaded {}: price={} trust={} sentiment={}",
      coin_id, data.price, data.trust_score, data.sentiment_score
    );
    Ok(data)
  }

  async fn details(&self, coin_id: &str) -> Option<CoinDetails> {
    match self.source.fetch_coin_details(coin_id).await {
      Ok(details) => Some(details),
      Err(e) => {
        warn!("Scoring {} without details: {}", coin_id, e);
        None
      }
    }
  }
}

/// The three snapshot fields a lookup cannot do without.
#[derive(Debug, Clone, Copy, PartialEq)]
struct RequiredFields {
  price: f64,
  market_cap: f64,
  volume: f64,
}

impl RequiredFields {
  /// Zero is rejected the same as missing.
  fn from_quote(quote: &SimplePriceQuote) -> Result<Self> {
    let present = |value: Option<f64>| value.filter(|v| *v != 0.0).ok_or(Error::InvalidMarketData);

    Ok(Self {
      price: present(quote.usd)?,
      market_cap: present(quote.usd_market_cap)?,
      volume: present(quote.usd_24h_vol)?,
    })
  }
}

fn build_market_data(
  coin_id: &str,
  quote: &SimplePriceQuote,
  required: RequiredFields,
  details: Option<&CoinDetails>,
) -> MarketData {
  MarketData {
    raw_data: coin_id.to_string(),
    price: required.price,
    market_cap: required.market_cap,
    tvl: required.volume,
    trust_score: scoring::trust_score(details),
    sentiment_score: scoring::sentiment_score(details),
    change_24h: quote.usd_24h_change,
    last_updated_at: quote.last_updated_at,
  }
}
