use anyhow::Result;
use clap::Parser;
use neutronote_data::Config;
use neutronote_data::config::find_home;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

use crate::cli::Cli;

mod cli;
mod commands;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging();

    let home = find_home()?;
    let config = Config::load(&home, cli.config_overrides())?;
    tracing::debug!("data root: {}", config.layout.data_root.display());

    let value = commands::run(&cli.command, &config, neutronote_nexus::default_backend())?;
    let json = commands::format_json(&value, cli.pretty)?;
    println!("{json}");

    Ok(())
}

/// Logs go to stderr so stdout stays a single JSON document. `RUST_LOG`
/// overrides the default level.
fn init_logging() {
    let default_level = "warn";
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(env_filter);

    let _ = tracing_subscriber::registry().with(fmt_layer).try_init();
}
