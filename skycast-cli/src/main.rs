//! Binary crate for the `skycast` weather client.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Interactive search and unit selection
//! - Drawing the display state in the terminal

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod render;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cmd = cli::Cli::parse();
    init_tracing(cmd.verbose);
    cmd.run().await
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "skycast=debug,skycast_core=debug"
    } else {
        "skycast=warn,skycast_core=warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .with_writer(std::io::stderr)
        .init();
}
