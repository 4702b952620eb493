//! Parser for the Mauna Loa monthly CO2 table.
//!
//! The source is an HTML page produced by `csv2html`, holding a single table
//! with the columns: year, month, decimal date, average, interpolated, trend,
//! days. The first rows of the table are header and metadata.

use scraper::{ElementRef, Html};
use tracing::debug;

use super::error::{parse_float, parse_int, ParseError, Result};
use super::models::{Co2Reading, Co2Readings};

/// `summary` attribute identifying the data table
pub const CO2_TABLE_SUMMARY: &str = "csv2html program output";
/// Header and metadata rows preceding the data
pub const CO2_HEADER_ROWS: usize = 3;
/// Rows with fewer cells than this are skipped
pub const CO2_MIN_CELLS: usize = 7;

/// Descendant elements of `parent` with the given tag name, in document order
fn elements_named<'a>(
    parent: ElementRef<'a>,
    name: &'a str,
) -> impl Iterator<Item = ElementRef<'a>> + 'a {
    parent
        .descendants()
        .skip(1)
        .filter_map(ElementRef::wrap)
        .filter(move |el| el.value().name() == name)
}

/// Parse the CO2 table out of an HTML document
pub fn parse_co2(html: &str) -> Result<Co2Readings> {
    let document = Html::parse_document(html);

    let table = elements_named(document.root_element(), "table")
        .find(|table| table.value().attr("summary") == Some(CO2_TABLE_SUMMARY))
        .ok_or_else(|| ParseError::TableNotFound {
            summary: CO2_TABLE_SUMMARY.to_string(),
        })?;

    let mut readings = Co2Readings::new();
    let mut skipped = 0usize;

    for (idx, row) in elements_named(table, "tr").enumerate().skip(CO2_HEADER_ROWS) {
        let line = idx + 1;
        let cells: Vec<String> = elements_named(row, "td")
            .map(|cell| cell.text().collect())
            .collect();

        if cells.len() < CO2_MIN_CELLS {
            skipped += 1;
            continue;
        }

        let year = parse_int(&cells[0], line, 1)?;
        let month = parse_int(&cells[1], line, 2)?;
        let reading = Co2Reading {
            decimal: parse_float(&cells[2], line, 3)?,
            average: parse_float(&cells[3], line, 4)?,
            interpolated: parse_float(&cells[4], line, 5)?,
            trend: parse_float(&cells[5], line, 6)?,
            days: parse_int(&cells[6], line, 7)?,
        };
        readings.insert((year, month), reading);
    }

    debug!(records = readings.len(), skipped, "Parsed CO2 table");
    Ok(readings)
}
