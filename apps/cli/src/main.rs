//! postfeed CLI — Notion-hosted blog content as JSON.
//!
//! Exposes the content adapter's four read operations to a frontend build
//! step: site title, published posts, post metadata and page blocks.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
