use crate::app::App;
use crate::render;
use anyhow::{Context, Result};
use ci_dashboard::search::MIN_QUERY_CHARS;
use ci_dashboard::{CoinDataState, LoadPhase, SearchController, SearchState};
use ci_models::FeedSet;
use clap::Args;
use colored::Colorize;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;
use tracing::debug;

#[derive(Args, Debug)]
pub struct InteractiveCommand {}

#[derive(Debug, PartialEq)]
enum Input {
  Empty,
  Quit,
  Clear,
  /// 1-based index into the latest results
  Select(usize),
  Query(String),
}

fn parse_line(line: &str) -> Input {
  let line = line.trim();
  match line {
    "" => Input::Empty,
    ":q" | ":quit" => Input::Quit,
    ":clear" => Input::Clear,
    _ => match line.strip_prefix(':').and_then(|n| n.parse::<usize>().ok()) {
      Some(n) => Input::Select(n),
      None => Input::Query(line.to_string()),
    },
  }
}

pub async fn execute(_cmd: InteractiveCommand, app: &App) -> Result<()> {
  let hydrated = app.hydrate().await;
  debug!("Starting interactive session with {} cached coins", hydrated);

  let controller = app.search_controller();
  let search_view = tokio::spawn(render_searches(controller.subscribe()));
  let lookup_view = tokio::spawn(render_lookups(app.orchestrator.subscribe()));

  println!(
    "{}",
    "Type a query to search, :<n> to open result n, :clear to deselect, :q to quit".dimmed()
  );

  let mut lines = BufReader::new(tokio::io::stdin()).lines();
  while let Some(line) = lines.next_line().await.context("Failed to read input")? {
    match parse_line(&line) {
      Input::Empty => continue,
      Input::Quit => break,
      Input::Clear => {
        controller.clear();
        app.orchestrator.select(None).await;
        println!("Selection cleared");
      }
      Input::Select(n) => match take_selection(&controller, n) {
        Some(coin_id) => {
          let orchestrator = app.orchestrator.clone();
          tokio::spawn(async move { orchestrator.select(Some(coin_id)).await });
        }
        None => render::error(&format!("No result #{n}")),
      },
      Input::Query(query) => {
        if query.chars().count() < MIN_QUERY_CHARS {
          println!("Type at least {MIN_QUERY_CHARS} characters to search");
        } else {
          controller.input(query);
        }
      }
    }
  }

  search_view.abort();
  lookup_view.abort();
  Ok(())
}

/// Id of the 1-based result `n`. A valid pick clears the search box.
fn take_selection(controller: &SearchController, n: usize) -> Option<String> {
  let results = controller.state().results;
  let coin_id = n.checked_sub(1).and_then(|i| results.get(i)).map(|r| r.id.clone())?;
  controller.clear();
  Some(coin_id)
}

/// A finished search that has not been printed yet. Keystrokes alone change
/// the query but not the generation.
fn should_render(last_rendered: u64, state: &SearchState) -> bool {
  !state.is_loading && !state.query.is_empty() && state.generation != last_rendered
}

async fn render_searches(mut rx: watch::Receiver<SearchState>) {
  let mut last_rendered = 0;
  while rx.changed().await.is_ok() {
    let state = rx.borrow_and_update().clone();
    if should_render(last_rendered, &state) {
      println!("Results for {:?}:", state.query);
      render::search_results(&state.results);
      last_rendered = state.generation;
    }
  }
}

async fn render_lookups(mut rx: watch::Receiver<CoinDataState>) {
  while rx.changed().await.is_ok() {
    let state = rx.borrow_and_update().clone();
    match state.phase() {
      LoadPhase::Loading => {
        println!("{}", format!("Loading {}...", state.coin_id.unwrap_or_default()).dimmed())
      }
      LoadPhase::Success => {
        if let Some(data) = &state.data {
          render::dashboard(data);
          render::feeds(&FeedSet::placeholder());
        }
      }
      LoadPhase::Error => render::error(state.error.as_deref().unwrap_or("Lookup failed")),
      LoadPhase::Idle => {}
    }
  }
}
