//! Parser for the satellite sea-level CSV export.

use tracing::{debug, trace};

use super::error::{parse_float, Result};
use super::models::{SeaLevelReading, SeaLevelReadings};

/// Header and metadata lines preceding the data
pub const SEA_LEVEL_HEADER_LINES: usize = 4;
pub const SEA_LEVEL_DELIMITER: char = ',';
/// Lines with fewer fields than this are skipped
pub const SEA_LEVEL_MIN_FIELDS: usize = 2;

/// Parse sea-level readings keyed by their date column.
///
/// The date is kept verbatim. The sea-level column is mandatory; the first
/// correction column falls back to `None` when it is not a number.
pub fn parse_sea_level(text: &str) -> Result<SeaLevelReadings> {
    let mut readings = SeaLevelReadings::new();
    let mut skipped = 0usize;

    for (idx, line) in text.lines().enumerate().skip(SEA_LEVEL_HEADER_LINES) {
        let fields: Vec<&str> = line.split(SEA_LEVEL_DELIMITER).collect();
        if fields.len() < SEA_LEVEL_MIN_FIELDS {
            skipped += 1;
            continue;
        }

        let sea_level = parse_float(fields[1], idx + 1, 2)?;
        let j1 = fields.get(2).and_then(|raw| {
            let value: Option<f64> = raw.trim().parse().ok();
            if value.is_none() {
                trace!(line = idx + 1, raw = *raw, "Correction value absent");
            }
            value
        });

        readings.insert(fields[0].to_string(), SeaLevelReading::new(sea_level, j1));
    }

    debug!(records = readings.len(), skipped, "Parsed sea level data");
    Ok(readings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::ParseError;

    const HEADER: &str = "title\nsource\nunits\nyear,sea_level,j1\n";

    #[test]
    fn test_parse_sea_level_lines() {
        let text = format!("{HEADER}1992.9614,5.916,5.916\n1993.0156,1.421,\n");
        let readings = parse_sea_level(&text).unwrap();

        assert_eq!(readings.len(), 2);
        assert_eq!(
            readings["1992.9614"],
            SeaLevelReading {
                sea_level: 5.916,
                j1: Some(5.916),
                j2: None,
                j3: None,
            }
        );
        assert_eq!(readings["1993.0156"].j1, None);
    }

    #[test]
    fn test_non_numeric_correction_is_absent() {
        let text = format!("{HEADER}1993.0427,-3.2,n/a,7.0,8.0\n");
        let readings = parse_sea_level(&text).unwrap();
        let reading = readings["1993.0427"];
        assert_eq!(reading.sea_level, -3.2);
        assert_eq!(reading.j1, None);
        // Columns past the third are never read
        assert_eq!(reading.j2, None);
        assert_eq!(reading.j3, None);
    }

    #[test]
    fn test_missing_correction_column() {
        let text = format!("{HEADER}1993.0698,2.5\n");
        let readings = parse_sea_level(&text).unwrap();
        assert_eq!(readings["1993.0698"], SeaLevelReading::new(2.5, None));
    }

    #[test]
    fn test_short_lines_are_skipped() {
        let text = format!("{HEADER}\nno delimiter here\n1993.0969,4.0,4.1\n");
        let readings = parse_sea_level(&text).unwrap();
        assert_eq!(readings.len(), 1);
        assert!(readings.contains_key("1993.0969"));
    }

    #[test]
    fn test_header_lines_are_skipped() {
        let text = "1.0,1.0\n2.0,2.0\n3.0,3.0\n4.0,4.0\n5.0,5.0\n";
        let readings = parse_sea_level(text).unwrap();
        assert_eq!(readings.keys().collect::<Vec<_>>(), vec!["5.0"]);
    }

    #[test]
    fn test_crlf_line_endings() {
        let text = "a\r\nb\r\nc\r\nd\r\n1992.9614,5.916,5.916\r\n";
        let readings = parse_sea_level(text).unwrap();
        assert_eq!(readings["1992.9614"].j1, Some(5.916));
    }

    #[test]
    fn test_non_numeric_sea_level_fails() {
        let text = format!("{HEADER}1992.9614,high,5.916\n");
        let err = parse_sea_level(&text).unwrap_err();
        assert!(matches!(
            err,
            ParseError::InvalidFloat { line: 5, column: 2, .. }
        ));
    }

    #[test]
    fn test_header_only_input_is_empty() {
        assert!(parse_sea_level(HEADER).unwrap().is_empty());
        assert!(parse_sea_level("").unwrap().is_empty());
    }
}
