mod actions;
mod app;
mod cli;
mod component;
mod config;
mod libs;
mod page;
mod tui;
mod utils;

use app::{App, RootState};
use clap::Parser;
use color_eyre::eyre::Result;
use dotenv::dotenv;

#[cfg(not(tarpaulin_include))]
async fn run() -> Result<()> {
    use cli::ClapSource;
    use color_eyre::eyre::Context;
    use tracing::info;

    let args = cli::Cli::parse();

    let config = config::Config::new(Some(ClapSource::new(&args)))
        .context("Error when loading config")?;
    utils::logging::init(&config.config.data_dir)?;
    info!(
        "Starting with week start {}, zone {}, invalid commit policy {}",
        config.picker.week_start, config.picker.zone, config.picker.invalid_commit
    );

    let state = RootState::new(config);
    let mut app = App::new(
        state,
        tui::Tui::new()?
            .tick_rate(args.tick_rate)
            .frame_rate(args.frame_rate),
    );

    app.run().await
}

#[tokio::main]
#[cfg(not(tarpaulin_include))]
async fn main() -> Result<()> {
    dotenv().ok();
    utils::errors::init()?;

    run().await
}
