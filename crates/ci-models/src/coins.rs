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

//! Coin catalogue models: `/coins/list`, `/coins/markets` and the persisted
//! cache envelope.

use serde::{Deserialize, Serialize};

/// Entry from `/coins/list`, optionally enriched with a market cap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoinListItem {
  /// Stable CoinGecko id, unique within a catalogue
  pub id: String,
  pub symbol: String,
  pub name: String,
  /// USD market cap. Zero when the coin is outside the enrichment page.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub market_cap: Option<f64>,
}

impl CoinListItem {
  pub fn new(id: impl Into<String>, symbol: impl Into<String>, name: impl Into<String>) -> Self {
    Self { id: id.into(), symbol: symbol.into(), name: name.into(), market_cap: None }
  }

  /// Builder: set the market cap
  pub fn with_market_cap(mut self, market_cap: f64) -> Self {
    self.market_cap = Some(market_cap);
    self
  }
}

/// Entry from `/coins/markets`. Only the fields used for enrichment are kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketCoin {
  pub id: String,
  #[serde(default)]
  pub symbol: String,
  #[serde(default)]
  pub name: String,
  #[serde(default, deserialize_with = "crate::lenient::f64_opt")]
  pub market_cap: Option<f64>,
  #[serde(default)]
  pub market_cap_rank: Option<u32>,
}

/// Persisted form of the coin list cache.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CacheEnvelope {
  pub coins: Vec<CoinListItem>,
  /// Epoch milliseconds of the refresh that produced `coins`
  #[serde(rename = "lastUpdate")]
  pub last_update: i64,
}

impl CacheEnvelope {
  pub fn new(coins: Vec<CoinListItem>, last_update: i64) -> Self {
    Self { coins, last_update }
  }

  pub fn is_empty(&self) -> bool {
    self.coins.is_empty()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_coin_list_item_from_coins_list() {
    let json = r#"[{"id":"bitcoin","symbol":"btc","name":"Bitcoin"}]"#;
    let coins: Vec<CoinListItem> = serde_json::from_str(json).unwrap();
    assert_eq!(coins[0].id, "bitcoin");
    assert_eq!(coins[0].market_cap, None);
  }

  #[test]
  fn test_market_coin_with_null_market_cap() {
    let json = r#"{"id":"foo","symbol":"foo","name":"Foo","market_cap":null,"current_price":1.0}"#;
    let coin: MarketCoin = serde_json::from_str(json).unwrap();
    assert_eq!(coin.market_cap, None);
    assert_eq!(coin.market_cap_rank, None);
  }

  #[test]
  fn test_envelope_layout() {
    let envelope =
      CacheEnvelope::new(vec![CoinListItem::new("bitcoin", "btc", "Bitcoin").with_market_cap(1e12)], 42);
    let value = serde_json::to_value(&envelope).unwrap();
    assert_eq!(value["lastUpdate"], 42);
    assert_eq!(value["coins"][0]["market_cap"], 1e12);

    let parsed: CacheEnvelope = serde_json::from_value(value).unwrap();
    assert_eq!(parsed, envelope);
  }
}
