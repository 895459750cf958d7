mod cli;
mod config;
mod output;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use log::info;

fn main() -> Result<()> {
    env_logger::init();

    output::print_banner();

    let cli = Cli::parse();
    info!("Starting PipeLens - CI/CD Log Parsing Tool");
    cli.execute()?;

    Ok(())
}
