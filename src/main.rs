//! climate-db: imports the Mauna Loa CO2 table and the satellite sea-level
//! series into SQLite, then looks up and deletes records.
//!
//! With no subcommand the binary runs the full demonstration sequence against
//! `Co2.html`, `SeaLevel.csv` and `climate_data4.db` in the working directory.

mod cli;
mod data;
mod driver;

use anyhow::Result;
use cli::{AppConfig, Cli};
use tracing_subscriber::EnvFilter;

fn init_tracing(log_level: Option<&str>) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.unwrap_or("warn")));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse_args();
    init_tracing(cli.log_level.as_deref());

    let config = AppConfig::from_cli(cli);
    tracing::debug!(?config, "Resolved configuration");

    driver::run(config)
}
