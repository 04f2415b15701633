#![recursion_limit = "256"]

mod cli;
mod application;
mod domain;
mod data;
mod analysis;
mod ml;
mod infra;
mod error;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("password_lstm=info".parse()?))
        .init();

    let cli = Cli::parse();
    cli.run()
}
