//! Data models for the CO2 and sea-level datasets.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

/// Monthly CO2 readings keyed by (year, month)
pub type Co2Readings = BTreeMap<(i64, i64), Co2Reading>;

/// Sea-level readings keyed by the fractional-year string from the source file
pub type SeaLevelReadings = BTreeMap<String, SeaLevelReading>;

/// The measured values of one CO2 month, without its key
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Co2Reading {
    pub decimal: f64,
    pub average: f64,
    pub interpolated: f64,
    pub trend: f64,
    pub days: i64,
}

/// The measured values of one sea-level sample, without its key
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeaLevelReading {
    pub sea_level: f64,
    pub j1: Option<f64>,
    pub j2: Option<f64>,
    pub j3: Option<f64>,
}

impl SeaLevelReading {
    /// A reading with only the mandatory value and first correction column
    pub fn new(sea_level: f64, j1: Option<f64>) -> Self {
        SeaLevelReading {
            sea_level,
            j1,
            j2: None,
            j3: None,
        }
    }
}

/// A full row of the `co2` table
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Co2Record {
    pub year: i64,
    pub month: i64,
    #[serde(flatten)]
    pub reading: Co2Reading,
}

impl Co2Record {
    pub fn new(year: i64, month: i64, reading: Co2Reading) -> Self {
        Co2Record {
            year,
            month,
            reading,
        }
    }
}

/// A full row of the `sealevel` table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeaLevelRecord {
    pub date: String,
    #[serde(flatten)]
    pub reading: SeaLevelReading,
}

impl SeaLevelRecord {
    pub fn new(date: String, reading: SeaLevelReading) -> Self {
        SeaLevelRecord { date, reading }
    }
}

/// Format a REAL value, always keeping a fractional digit (`5.0`, not `5`)
pub fn fmt_real(value: f64) -> String {
    if value.is_nan() {
        "nan".to_string()
    } else if value == f64::INFINITY {
        "inf".to_string()
    } else if value == f64::NEG_INFINITY {
        "-inf".to_string()
    } else if value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        value.to_string()
    }
}

/// Format an optional correction value the way an absent SQL value reads
fn fmt_optional(value: Option<f64>) -> String {
    value.map_or_else(|| "None".to_string(), fmt_real)
}

impl fmt::Display for SeaLevelRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = &self.reading;
        write!(
            f,
            "('{}', {}, {}, {}, {})",
            self.date,
            fmt_real(r.sea_level),
            fmt_optional(r.j1),
            fmt_optional(r.j2),
            fmt_optional(r.j3)
        )
    }
}
