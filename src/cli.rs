//! Command-line interface argument parsing for climate-db.
//!
//! Running with no subcommand performs the full demonstration sequence:
//! - `climate-db`
//! - `climate-db --co2 data/Co2.html --sea-level data/SeaLevel.csv --db climate.db`
//! - `climate-db find-co2 --year 1959 --month 1 --json`

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Default location of the CO2 HTML table
pub const DEFAULT_CO2_PATH: &str = "Co2.html";
/// Default location of the sea-level CSV
pub const DEFAULT_SEA_LEVEL_PATH: &str = "SeaLevel.csv";
/// Default database file
pub const DEFAULT_DB_PATH: &str = "climate_data4.db";
/// Environment variable overriding the default database file
pub const DB_PATH_ENV: &str = "CLIMATE_DB_PATH";

/// Import CO2 and sea-level datasets into SQLite and query them.
#[derive(Parser, Debug)]
#[command(name = "climate-db")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the CO2 HTML table
    #[arg(long, global = true, default_value = DEFAULT_CO2_PATH)]
    pub co2: PathBuf,

    /// Path to the sea-level CSV file
    #[arg(long, global = true, default_value = DEFAULT_SEA_LEVEL_PATH)]
    pub sea_level: PathBuf,

    /// Path to the SQLite database file
    /// Defaults to $CLIMATE_DB_PATH, then ./climate_data4.db
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error); RUST_LOG takes precedence
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Parse, import, look up and delete sample records (the default)
    Demo,

    /// Parse both datasets and import them into the database
    Import,

    /// Look up the CO2 reading for a month
    FindCo2 {
        #[arg(short, long)]
        year: i64,

        #[arg(short, long)]
        month: i64,

        /// Print the row as JSON
        #[arg(long)]
        json: bool,
    },

    /// Look up the sea-level reading for a date key (e.g. "1992.9614")
    FindSeaLevel {
        date: String,

        /// Print the row as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete all CO2 readings for a YYYY-MM key
    DeleteCo2 { key: String },

    /// Delete all sea-level readings for a date key
    DeleteSeaLevel { date: String },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub co2_path: PathBuf,
    pub sea_level_path: PathBuf,
    pub db_path: PathBuf,
    pub command: Commands,
}

impl AppConfig {
    /// Resolve the run configuration from parsed arguments
    pub fn from_cli(cli: Cli) -> Self {
        let db_path = cli.db.unwrap_or_else(|| {
            std::env::var_os(DB_PATH_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_PATH))
        });

        AppConfig {
            co2_path: cli.co2,
            sea_level_path: cli.sea_level,
            db_path,
            command: cli.command.unwrap_or(Commands::Demo),
        }
    }
}
