use crate::app::App;
use crate::render;
use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

#[derive(Args, Debug)]
pub struct RefreshCommand {}

pub async fn execute(_cmd: RefreshCommand, app: &App) -> Result<()> {
  let spinner = render::spinner("Downloading coin list");
  let outcome = app.cache.refresh().await;
  spinner.finish_and_clear();

  let count = outcome.context("Failed to refresh coin list")?;
  info!("Coin list refreshed");

  println!(
    "Cached {} coins in {}",
    count,
    app.config.cache_dir.join(format!("{}.json", ci_dashboard::COIN_LIST_KEY)).display()
  );
  Ok(())
}
