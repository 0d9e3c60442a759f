use serde::{Deserialize, Serialize};

/// Subset of the CoinGecko `/coins/{id}` response used for scoring
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoinDetails {
  #[serde(default)]
  pub id: Option<String>,
  #[serde(default)]
  pub symbol: Option<String>,
  #[serde(default)]
  pub name: Option<String>,
  #[serde(default)]
  pub community_data: Option<CommunityData>,
  #[serde(default)]
  pub developer_data: Option<DeveloperData>,
  #[serde(default, deserialize_with = "crate::lenient::f64_opt")]
  pub sentiment_votes_up_percentage: Option<f64>,
  #[serde(default, deserialize_with = "crate::lenient::f64_opt")]
  pub sentiment_votes_down_percentage: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommunityData {
  #[serde(default, deserialize_with = "crate::lenient::u64_opt")]
  pub twitter_followers: Option<u64>,
  #[serde(default, deserialize_with = "crate::lenient::u64_opt")]
  pub reddit_subscribers: Option<u64>,
  #[serde(default, deserialize_with = "crate::lenient::u64_opt")]
  pub telegram_channel_user_count: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeveloperData {
  #[serde(default, deserialize_with = "crate::lenient::u64_opt")]
  pub forks: Option<u64>,
  #[serde(default, deserialize_with = "crate::lenient::u64_opt")]
  pub stars: Option<u64>,
  #[serde(default, deserialize_with = "crate::lenient::u64_opt")]
  pub total_issues: Option<u64>,
  #[serde(default, deserialize_with = "crate::lenient::u64_opt")]
  pub closed_issues: Option<u64>,
  #[serde(default, deserialize_with = "crate::lenient::u64_opt")]
  pub pull_requests_merged: Option<u64>,
  #[serde(default, deserialize_with = "crate::lenient::u64_opt")]
  pub pull_request_contributors: Option<u64>,
}
