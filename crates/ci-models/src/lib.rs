//! # ci-models
//!
//! Data models for CoinGecko API responses and the dashboard state built
//! from them.
//!
//! - [`coins`]: the coin catalogue, market cap enrichment and the persisted cache envelope
//! - [`price`]: `/simple/price` snapshots, deserialized leniently
//! - [`details`]: community, developer and sentiment data from `/coins/{id}`
//! - [`market`]: the computed [`MarketData`] and [`SearchResult`] views
//! - [`feeds`]: placeholder social/news feed items
//!
//! ## Usage
//!
//! ```ignore
//! use ci_models::CoinSnapshot;
//!
//! let snapshot: CoinSnapshot = serde_json::from_str(&response_json)?;
//! let quote = snapshot.quote("bitcoin");
//! ```

#![warn(clippy::all)]

pub mod coins;
pub mod details;
pub mod feeds;
pub mod market;
pub mod price;

mod lenient;

pub use coins::*;
pub use details::*;
pub use feeds::*;
pub use market::*;
pub use price::*;
