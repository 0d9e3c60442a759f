//! # ci-client
//!
//! A pure CoinGecko API client for Rust with no persistence dependencies.
//!
//! ## Features
//!
//! - **Async/Await**: Built on tokio and reqwest
//! - **Rate Limiting**: Client-side quota via `governor`, sized to the API tier
//! - **Type Safe**: Strongly typed responses using ci-models
//! - **Configurable**: Environment-based configuration via ci-core
//!
//! ## Usage
//!
//! ```rust,no_run
//! use ci_client::CoinGeckoClient;
//! use ci_core::Config;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_env()?;
//!     let client = CoinGeckoClient::new(config)?;
//!
//!     let coins = client.coins().list().await?;
//!     println!("{} coins listed", coins.len());
//!
//!     let snapshot = client.simple().price("bitcoin").await?;
//!     println!("{:?}", snapshot.quote("bitcoin"));
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! All methods return `Result<T, ci_core::Error>`. Failed requests are never
//! retried; a non-2xx response becomes [`Error::Status`].

#![deny(missing_docs)]
#![warn(clippy::all)]

/// Client entry point
pub mod client;
/// Endpoint groups
#[allow(missing_docs)]
pub mod endpoints;
/// HTTP transport
#[allow(missing_docs)]
pub mod transport;

pub use ci_core::{Config, Error, Result};
pub use client::CoinGeckoClient;

pub use endpoints::{coins::CoinsEndpoints, simple::SimpleEndpoints};
