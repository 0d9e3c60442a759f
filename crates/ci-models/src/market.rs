//! Views computed by the dashboard: the looked-up [`MarketData`] and
//! [`SearchResult`] rows.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Market metrics and composite scores for one coin lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketData {
  /// The coin id the lookup was made for
  pub raw_data: String,
  /// Spot price in USD
  pub price: f64,
  #[serde(rename = "marketCap")]
  pub market_cap: f64,
  /// 24h trading volume in USD
  pub tvl: f64,
  /// Blend of developer and social scores, 0-100
  #[serde(rename = "trustScore")]
  pub trust_score: u8,
  /// Upstream share of positive sentiment votes, 0-100
  #[serde(rename = "sentimentScore")]
  pub sentiment_score: f64,
  #[serde(rename = "change24h", default, skip_serializing_if = "Option::is_none")]
  pub change_24h: Option<f64>,
  /// Epoch seconds of the upstream quote
  #[serde(rename = "lastUpdatedAt", default, skip_serializing_if = "Option::is_none")]
  pub last_updated_at: Option<i64>,
}

/// Which catalogue field a search result matched on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchType {
  Id,
  Symbol,
  Name,
}

impl fmt::Display for MatchType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      MatchType::Id => write!(f, "id"),
      MatchType::Symbol => write!(f, "symbol"),
      MatchType::Name => write!(f, "name"),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
  pub id: String,
  pub symbol: String,
  pub name: String,
  #[serde(rename = "type")]
  pub match_type: MatchType,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub market_cap: Option<f64>,
}
