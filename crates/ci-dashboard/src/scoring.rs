//! Composite trust and sentiment scores.
//!
//! Every metric is min-max normalised against a fixed range, weighted, and
//! scaled to an integer in `0..=100`. Missing inputs count as zero.

use ci_models::{CoinDetails, CommunityData, DeveloperData};

const FORKS_MAX: f64 = 50_000.0;
const STARS_MAX: f64 = 100_000.0;
const MERGED_PRS_MAX: f64 = 10_000.0;
const CONTRIBUTORS_MAX: f64 = 1_000.0;

const FORKS_WEIGHT: f64 = 0.2;
const STARS_WEIGHT: f64 = 0.3;
const ISSUES_WEIGHT: f64 = 0.2;
const PRS_WEIGHT: f64 = 0.15;
const CONTRIBUTORS_WEIGHT: f64 = 0.15;

const TWITTER_MAX: f64 = 5_000_000.0;
const REDDIT_MAX: f64 = 5_000_000.0;
const TELEGRAM_MAX: f64 = 500_000.0;

const TWITTER_WEIGHT: f64 = 0.4;
const REDDIT_WEIGHT: f64 = 0.4;
const TELEGRAM_WEIGHT: f64 = 0.2;

/// Sentiment reported when upstream has no vote data
pub const NEUTRAL_SENTIMENT: f64 = 50.0;

/// Map `value` into `[0, 1]` relative to `[min, max]`, clamping outliers.
///
/// Callers must pass `min < max`.
pub fn normalize(value: f64, min: f64, max: f64) -> f64 {
  debug_assert!(min < max, "normalize called with empty range [{min}, {max}]");
  ((value - min) / (max - min)).clamp(0.0, 1.0)
}

fn to_score(weighted: f64) -> u8 {
  // weighted is a convex combination of unit values
  (weighted * 100.0).round().clamp(0.0, 100.0) as u8
}

fn metric(value: Option<u64>) -> f64 {
  value.unwrap_or(0) as f64
}

/// Fraction of issues closed. A zero or missing total divides by one.
fn closed_issue_ratio(dev: &DeveloperData) -> f64 {
  let total = match dev.total_issues {
    Some(total) if total > 0 => total as f64,
    _ => 1.0,
  };
  metric(dev.closed_issues) / total
}

/// Repository activity score, 0-100.
pub fn developer_score(dev: Option<&DeveloperData>) -> u8 {
  let empty = DeveloperData::default();
  let dev = dev.unwrap_or(&empty);

  let forks = normalize(metric(dev.forks), 0.0, FORKS_MAX);
  let stars = normalize(metric(dev.stars), 0.0, STARS_MAX);
  let issues = normalize(closed_issue_ratio(dev), 0.0, 1.0);
  let prs = normalize(metric(dev.pull_requests_merged), 0.0, MERGED_PRS_MAX);
  let contributors = normalize(metric(dev.pull_request_contributors), 0.0, CONTRIBUTORS_MAX);

  to_score(
    forks * FORKS_WEIGHT
      + stars * STARS_WEIGHT
      + issues * ISSUES_WEIGHT
      + prs * PRS_WEIGHT
      + contributors * CONTRIBUTORS_WEIGHT,
  )
}

/// Community reach score, 0-100.
pub fn social_score(community: Option<&CommunityData>) -> u8 {
  let empty = CommunityData::default();
  let community = community.unwrap_or(&empty);

  let twitter = normalize(metric(community.twitter_followers), 0.0, TWITTER_MAX);
  let reddit = normalize(metric(community.reddit_subscribers), 0.0, REDDIT_MAX);
  let telegram = normalize(metric(community.telegram_channel_user_count), 0.0, TELEGRAM_MAX);

  to_score(twitter * TWITTER_WEIGHT + reddit * REDDIT_WEIGHT + telegram * TELEGRAM_WEIGHT)
}

/// Mean of the developer and social scores, rounded.
pub fn trust_score(details: Option<&CoinDetails>) -> u8 {
  let dev = developer_score(details.and_then(|d| d.developer_data.as_ref()));
  let social = social_score(details.and_then(|d| d.community_data.as_ref()));
  ((f64::from(dev) + f64::from(social)) / 2.0).round() as u8
}

/// Share of positive sentiment votes, or [`NEUTRAL_SENTIMENT`] without data.
pub fn sentiment_score(details: Option<&CoinDetails>) -> f64 {
  details
    .and_then(|d| d.sentiment_votes_up_percentage)
    .filter(|v| v.is_finite())
    .map_or(NEUTRAL_SENTIMENT, |v| v.clamp(0.0, 100.0))
}
