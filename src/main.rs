mod app;
mod cli;
mod components;
mod event;
mod loader;
mod logging;
mod model;
mod ui;

use anyhow::Result;
use clap::Parser;
use cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.command.log())?;
    app::run(cli).await
}
