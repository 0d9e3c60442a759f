//! Social and news feed items shown beside the metrics.
//!
//! No feed integration exists yet; [`FeedSet::placeholder`] is what the
//! front end renders.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelegramMessage {
  pub id: String,
  pub content: String,
  pub timestamp: DateTime<Utc>,
  pub author: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TwitterMetrics {
  pub likes: u64,
  pub reposts: u64,
  pub views: u64,
  #[serde(rename = "verifiedComments")]
  pub verified_comments: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TwitterPost {
  pub id: String,
  pub content: String,
  pub metrics: TwitterMetrics,
  pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NewsSentiment {
  Positive,
  Negative,
  Neutral,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsArticle {
  pub id: String,
  pub title: String,
  pub summary: String,
  pub url: String,
  pub sentiment: NewsSentiment,
  pub timestamp: DateTime<Utc>,
}

/// The three feeds rendered under a successful lookup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeedSet {
  pub telegram: Vec<TelegramMessage>,
  pub twitter: Vec<TwitterPost>,
  pub news: Vec<NewsArticle>,
}

impl FeedSet {
  /// Empty feeds, until a provider is wired in
  pub fn placeholder() -> Self {
    Self::default()
  }

  pub fn is_empty(&self) -> bool {
    self.telegram.is_empty() && self.twitter.is_empty() && self.news.is_empty()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_placeholder_is_empty() {
    assert!(FeedSet::placeholder().is_empty());
  }

  #[test]
  fn test_news_sentiment_tag() {
    assert_eq!(serde_json::to_value(NewsSentiment::Neutral).unwrap(), "neutral");
  }
}
