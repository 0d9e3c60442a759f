use crate::app::App;
use crate::render;
use anyhow::{bail, Context, Result};
use ci_models::FeedSet;
use clap::Args;

#[derive(Args, Debug)]
pub struct LookupCommand {
  /// CoinGecko coin id, e.g. "bitcoin"
  coin_id: String,

  /// Print the lookup state as JSON
  #[arg(long)]
  json: bool,
}

pub async fn execute(cmd: LookupCommand, app: &App) -> Result<()> {
  let spinner = render::spinner(format!("Loading {}", cmd.coin_id));
  app.orchestrator.select(Some(cmd.coin_id.clone())).await;
  spinner.finish_and_clear();

  let state = app.orchestrator.state();

  if cmd.json {
    println!("{}", serde_json::to_string_pretty(&state).context("Failed to encode state")?);
    return Ok(());
  }

  if let Some(error) = &state.error {
    render::error(error);
    bail!("Lookup of {} failed", cmd.coin_id);
  }

  if let Some(data) = &state.data {
    render::dashboard(data);
    render::feeds(&FeedSet::placeholder());
  }
  Ok(())
}
