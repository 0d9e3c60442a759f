use thiserror::Error;

/// The main error type for ci-* crates
#[derive(Error, Debug)]
pub enum Error {
  /// Configuration error
  #[error("Configuration error: {0}")]
  Config(String),

  /// API key error
  #[error("API key error: {0}")]
  ApiKey(String),

  /// Serialization/Deserialization error
  #[error("Serialization error: {0}")]
  Serde(#[from] serde_json::Error),

  /// HTTP transport error (connect, TLS, body read)
  #[error("HTTP error: {0}")]
  Http(String),

  /// Non-2xx response from the API
  #[error("API returned HTTP {status}: {message}")]
  Status { status: u16, message: String },

  /// Parse error for response bodies
  #[error("Parse error: {0}")]
  Parse(String),

  /// A price snapshot without the numeric fields a lookup requires
  #[error("Invalid market data received")]
  InvalidMarketData,
}

impl Error {
  /// HTTP status code for [`Error::Status`], if any
  pub fn status(&self) -> Option<u16> {
    match self {
      Error::Status { status, .. } => Some(*status),
      _ => None,
    }
  }
}

/// Result type alias for ci-* crates
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_invalid_market_data_message_is_generic() {
    assert_eq!(Error::InvalidMarketData.to_string(), "Invalid market data received");
  }

  #[test]
  fn test_status_error() {
    let err = Error::Status { status: 429, message: "Too Many Requests".to_string() };
    assert_eq!(err.status(), Some(429));
    assert!(err.to_string().contains("429"));
    assert_eq!(Error::Http("boom".to_string()).status(), None);
  }
}
