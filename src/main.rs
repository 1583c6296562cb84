use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod classify;
mod cli;
mod duration;
mod enrich;
mod events;
mod ext;
mod github_events;
mod model;
mod pipeline;
mod publish;
mod render;
mod report;
mod timeline;
mod tracker_api;
mod util;
mod window;

use crate::cli::{normalize, Cli};

/// Logs go to stderr; stdout carries only the report.
fn init_logging(verbose: bool) {
  let default = if verbose { "debug" } else { "warn" };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

  let _ = tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .with_target(false)
    .try_init();
}

fn main() -> Result<()> {
  let cli = Cli::parse();

  if cli.gen_man {
    let page = util::render_man_page::<Cli>()?;
    print!("{}", page);
    return Ok(());
  }

  init_logging(cli.verbose);

  // Phase 1: normalize CLI (env fallbacks, window, validation)
  let cfg = normalize(cli)?;

  // Phase 2: fetch, assemble, render, deliver
  pipeline::run(&cfg)
}
