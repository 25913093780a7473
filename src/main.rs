mod cli;
mod client;
mod commands;
mod config;
mod error;
mod output;
mod responses;
mod terminal;
mod types;

use std::error::Error;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::Cli;
use config::Config;
use error::Result;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_env("JIRAFROG_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {e}");

        let mut source = e.source();
        while let Some(cause) = source {
            eprintln!("Caused by: {cause}");
            source = cause.source();
        }

        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    Cli::parse();

    let config = Config::load_or_init()?;
    commands::browse::run(&config).await
}
