//! Beacon CLI - runs the calculator, content pipeline, blog client and lead
//! relay from a terminal.
//!
//! ```text
//! beacon calc --principal 80000 --rate 7.9 --term 5 --cycles 2
//! beacon render blocks.json --out post.html
//! beacon posts
//! beacon post refinancing-101
//! beacon submit --source contact --name Pat --email pat@example.com
//! ```
//!
//! Logs go to stderr; set `RUST_LOG` to change the level (default `info`).

mod cli;
mod commands;

use anyhow::{Context, Result};
use beacon_config::SiteConfig;
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::cli::{Cli, Command};

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(env_filter)
        .init();
}

fn load_config(cli: &Cli) -> Result<SiteConfig> {
    match &cli.config {
        Some(path) => SiteConfig::load_from(path).context("failed to load --config file"),
        None => Ok(SiteConfig::load()),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = load_config(&cli)?;

    match cli.command {
        Command::Calc(args) => commands::calc(&config, &args),
        Command::Render(args) => commands::render(&args),
        Command::Posts(args) => commands::posts(&config, &args).await,
        Command::Post(args) => commands::post(&config, &args).await,
        Command::Submit(args) => commands::submit(&config, args).await,
    }
}
