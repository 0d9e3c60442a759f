use crate::app::App;
use crate::render;
use anyhow::{Context, Result};
use ci_dashboard::search::MIN_QUERY_CHARS;
use ci_dashboard::{CoinSearch, SearchState};
use clap::Args;
use std::sync::Arc;

#[derive(Args, Debug)]
pub struct SearchCommand {
  /// Partial name, symbol or id (at least 2 characters)
  query: String,

  /// Maximum number of results (defaults to CI_SEARCH_LIMIT)
  #[arg(short, long)]
  limit: Option<usize>,

  /// Print the search state as JSON
  #[arg(long)]
  json: bool,
}

pub async fn execute(cmd: SearchCommand, app: &App) -> Result<()> {
  if !cmd.json && cmd.query.trim().chars().count() < MIN_QUERY_CHARS {
    println!("Type at least {MIN_QUERY_CHARS} characters to search");
    return Ok(());
  }

  app.hydrate().await;

  let search = match cmd.limit {
    Some(limit) => Arc::new(CoinSearch::new(app.cache.clone()).with_limit(limit)),
    None => app.search.clone(),
  };

  let spinner = render::spinner(format!("Searching for {:?}", cmd.query));
  let results = search.search(&cmd.query).await;
  spinner.finish_and_clear();

  if cmd.json {
    let state = SearchState { query: cmd.query, results, ..SearchState::default() };
    println!("{}", serde_json::to_string_pretty(&state).context("Failed to encode results")?);
    return Ok(());
  }

  render::search_results(&results);
  Ok(())
}
