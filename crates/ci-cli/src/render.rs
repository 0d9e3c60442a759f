//! Terminal presentation: search results, the metrics dashboard and the
//! feed panels.

use chrono::DateTime;
use ci_models::{FeedSet, MarketData, NewsSentiment, SearchResult};
use colored::{ColoredString, Colorize};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

const SCORE_BAR_WIDTH: usize = 20;

/// `$1,234.56`; sub-dollar prices keep six decimals.
pub fn format_usd(value: f64) -> String {
  if value.abs() < 1.0 {
    return format!("${value:.6}");
  }

  let fixed = format!("{:.2}", value.abs());
  let (int_part, frac) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
  let sign = if value < 0.0 { "-" } else { "" };
  format!("{sign}${}.{frac}", group_thousands(int_part))
}

/// `$1.32T`, `$31.26B`, `$50.00M`, else [`format_usd`].
pub fn format_compact(value: f64) -> String {
  let abs = value.abs();
  if abs >= 1e12 {
    format!("${:.2}T", value / 1e12)
  } else if abs >= 1e9 {
    format!("${:.2}B", value / 1e9)
  } else if abs >= 1e6 {
    format!("${:.2}M", value / 1e6)
  } else {
    format_usd(value)
  }
}

fn group_thousands(digits: &str) -> String {
  let mut out = String::with_capacity(digits.len() + digits.len() / 3);
  for (i, c) in digits.chars().enumerate() {
    if i > 0 && (digits.len() - i) % 3 == 0 {
      out.push(',');
    }
    out.push(c);
  }
  out
}

pub fn score_bar(score: f64) -> String {
  let filled = ((score.clamp(0.0, 100.0) / 100.0) * SCORE_BAR_WIDTH as f64).round() as usize;
  format!("{}{}", "█".repeat(filled), "░".repeat(SCORE_BAR_WIDTH - filled))
}

fn colored_score(score: f64) -> ColoredString {
  let bar = score_bar(score);
  if score >= 70.0 {
    bar.green()
  } else if score >= 40.0 {
    bar.yellow()
  } else {
    bar.red()
  }
}

fn colored_change(change: f64) -> ColoredString {
  let text = format!("{change:+.2}% (24h)");
  if change >= 0.0 {
    text.green()
  } else {
    text.red()
  }
}

/// Spinner shown while a fetch is in flight
pub fn spinner(message: impl Into<String>) -> ProgressBar {
  let spinner = ProgressBar::new_spinner();
  if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
    spinner.set_style(style);
  }
  spinner.set_message(message.into());
  spinner.enable_steady_tick(Duration::from_millis(100));
  spinner
}

pub fn search_results(results: &[SearchResult]) {
  if results.is_empty() {
    println!("{}", "No matching coins".dimmed());
    return;
  }

  for (i, result) in results.iter().enumerate() {
    let cap = match result.market_cap {
      Some(cap) if cap > 0.0 => format_compact(cap),
      _ => "-".to_string(),
    };
    println!(
      "{:>3}. {} {} {:>8} {:>12}",
      i + 1,
      result.name.bold(),
      format!("({})", result.symbol.to_uppercase()).dimmed(),
      result.match_type.to_string().cyan(),
      cap
    );
  }
}

pub fn dashboard(data: &MarketData) {
  println!();
  println!("{}", data.raw_data.bold().underline());

  match data.change_24h {
    Some(change) => {
      println!("  {:<14}{}  {}", "Price", format_usd(data.price), colored_change(change))
    }
    None => println!("  {:<14}{}", "Price", format_usd(data.price)),
  }
  println!("  {:<14}{}", "Market Cap", format_compact(data.market_cap));
  println!("  {:<14}{}", "24h Volume", format_compact(data.tvl));
  println!(
    "  {:<14}{:>5}/100  {}",
    "Trust Score",
    data.trust_score,
    colored_score(f64::from(data.trust_score))
  );
  println!(
    "  {:<14}{:>5.1}/100  {}",
    "Sentiment",
    data.sentiment_score,
    colored_score(data.sentiment_score)
  );

  if let Some(updated) = data.last_updated_at.and_then(|ts| DateTime::from_timestamp(ts, 0)) {
    println!("  {:<14}{}", "Updated", updated.format("%Y-%m-%d %H:%M:%S UTC").to_string().dimmed());
  }
}

pub fn feeds(feeds: &FeedSet) {
  println!();
  println!("{}", "Telegram".bold());
  if feeds.telegram.is_empty() {
    println!("  {}", "No messages yet".dimmed());
  }
  for message in &feeds.telegram {
    println!("  {} {}", format!("@{}:", message.author).cyan(), message.content);
  }

  println!("{}", "Twitter".bold());
  if feeds.twitter.is_empty() {
    println!("  {}", "No posts yet".dimmed());
  }
  for post in &feeds.twitter {
    println!(
      "  {} {}",
      post.content,
      format!("♥ {} ↻ {} 👁 {}", post.metrics.likes, post.metrics.reposts, post.metrics.views)
        .dimmed()
    );
  }

  println!("{}", "News".bold());
  if feeds.news.is_empty() {
    println!("  {}", "No articles yet".dimmed());
  }
  for article in &feeds.news {
    let tag = match article.sentiment {
      NewsSentiment::Positive => "positive".green(),
      NewsSentiment::Negative => "negative".red(),
      NewsSentiment::Neutral => "neutral".normal(),
    };
    println!("  [{}] {} {}", tag, article.title.bold(), article.url.dimmed());
  }
}

pub fn error(message: &str) {
  eprintln!("{} {}", "error:".red().bold(), message);
}
