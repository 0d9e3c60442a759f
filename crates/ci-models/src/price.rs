//! `/simple/price` response models.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// USD quote for one coin.
///
/// Every field is optional: a missing, `null` or non-numeric value
/// deserializes to `None` so validation can reject the snapshot as a whole.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimplePriceQuote {
  #[serde(default, deserialize_with = "crate::lenient::f64_opt", skip_serializing_if = "Option::is_none")]
  pub usd: Option<f64>,
  #[serde(default, deserialize_with = "crate::lenient::f64_opt", skip_serializing_if = "Option::is_none")]
  pub usd_market_cap: Option<f64>,
  #[serde(default, deserialize_with = "crate::lenient::f64_opt", skip_serializing_if = "Option::is_none")]
  pub usd_24h_vol: Option<f64>,
  #[serde(default, deserialize_with = "crate::lenient::f64_opt", skip_serializing_if = "Option::is_none")]
  pub usd_24h_change: Option<f64>,
  /// Epoch seconds
  #[serde(default, deserialize_with = "crate::lenient::i64_opt", skip_serializing_if = "Option::is_none")]
  pub last_updated_at: Option<i64>,
}

/// `/simple/price` response keyed by coin id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CoinSnapshot(pub HashMap<String, SimplePriceQuote>);

impl CoinSnapshot {
  pub fn quote(&self, coin_id: &str) -> Option<&SimplePriceQuote> {
    self.0.get(coin_id)
  }

  pub fn insert(&mut self, coin_id: impl Into<String>, quote: SimplePriceQuote) {
    self.0.insert(coin_id.into(), quote);
  }
}
