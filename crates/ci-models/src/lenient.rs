//! Field deserializers that map malformed numbers to `None`.
//!
//! CoinGecko occasionally returns `null` or strings where a number is
//! documented. These helpers keep the surrounding struct parseable and leave
//! the decision about a bad field to the caller.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

pub(crate) fn f64_opt<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
  D: Deserializer<'de>,
{
  let value = Option::<Value>::deserialize(deserializer)?;
  Ok(value.and_then(|v| v.as_f64()).filter(|v| v.is_finite()))
}

pub(crate) fn i64_opt<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
  D: Deserializer<'de>,
{
  let value = Option::<Value>::deserialize(deserializer)?;
  Ok(value.and_then(|v| v.as_i64().or_else(|| v.as_f64().map(|f| f as i64))))
}

pub(crate) fn u64_opt<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
  D: Deserializer<'de>,
{
  let value = Option::<Value>::deserialize(deserializer)?;
  Ok(value.and_then(|v| {
    v.as_u64().or_else(|| v.as_f64().filter(|f| f.is_finite() && *f >= 0.0).map(|f| f as u64))
  }))
}
