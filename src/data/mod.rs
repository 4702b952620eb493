//! Data layer: dataset parsers and the SQLite record store.

mod co2;
mod error;
mod models;
mod sea_level;
mod storage;

pub use co2::parse_co2;
#[cfg(test)]
pub use error::ParseError;
pub use models::{fmt_real, Co2Readings, Co2Record, SeaLevelReadings, SeaLevelRecord};
pub use sea_level::parse_sea_level;
pub use storage::Database;
