/*
 *
 *
 *
 *
 * MIT License
 * Copyright (c) 2025. Dwight J. Browne
 * dwight[-at-]dwightjbrowne[-dot-]com
 *
 *
 * Permission is hereby granted, free of charge, to any person obtaining a copy
 * of this software and associated documentation files (the "Software"), to deal
 * in the Software without restriction, including without limitation the rights
 * to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
 * copies of the Software, and to permit persons to whom the Software is
 * furnished to do so, subject to the following conditions:
 *
 * The above copyright notice and this permission notice shall be included in all
 * copies or substantial portions of the Software.
 *
 * THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
 * IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
 * FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
 * AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
 * LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
 * OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
 * SOFTWARE.
 */

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dotenvy::dotenv;

mod app;
mod commands;
mod render;

use commands::{
  interactive::InteractiveCommand, lookup::LookupCommand, refresh::RefreshCommand,
  search::SearchCommand,
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(name = "ci")]
#[command(propagate_version = true)]
struct Cli {
  #[command(subcommand)]
  command: Commands,

  /// Verbose output
  #[arg(short, long, global = true)]
  verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
  /// Search coins by name, symbol or id
  Search(SearchCommand),
  /// Show market metrics and scores for one coin id
  Lookup(LookupCommand),
  /// Re-download the coin list regardless of age
  Refresh(RefreshCommand),
  /// Type queries, pick results, browse coins
  Interactive(InteractiveCommand),
}

#[tokio::main]
async fn main() -> Result<()> {
  // Load environment variables
  dotenv().ok();

  // Parse CLI arguments
  let cli = Cli::parse();

  // Initialize logging; RUST_LOG wins over the flag
  let log_level = if cli.verbose { "debug" } else { "info" };
  let filter = tracing_subscriber::EnvFilter::try_from_default_env()
    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));
  tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

  // Load configuration
  let config = ci_core::Config::from_env().context("Failed to load configuration")?;
  let app = app::App::from_config(config)?;

  // Execute command
  match cli.command {
    Commands::Search(cmd) => commands::search::execute(cmd, &app).await?,
    Commands::Lookup(cmd) => commands::lookup::execute(cmd, &app).await?,
    Commands::Refresh(cmd) => commands::refresh::execute(cmd, &app).await?,
    Commands::Interactive(cmd) => commands::interactive::execute(cmd, &app).await?,
  }

  Ok(())
}
