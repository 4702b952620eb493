//! Top-level command sequences wiring the parsers to the record store.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::cli::{AppConfig, Commands};
use crate::data::{
    fmt_real, parse_co2, parse_sea_level, Co2Readings, Co2Record, Database, SeaLevelReadings,
    SeaLevelRecord,
};

/// Month looked up and deleted by the demonstration sequence
pub const DEMO_CO2_KEY: (i64, i64) = (1959, 1);
/// Sea-level date looked up and deleted by the demonstration sequence
pub const DEMO_SEA_LEVEL_DATE: &str = "1992.9614";

/// Run the configured command. Source files are read and parsed before the
/// database is opened, so a bad input never creates a database file.
pub fn run(config: AppConfig) -> Result<()> {
    let db = match &config.command {
        Commands::Demo => {
            let (co2, sea_level) = load_datasets(&config)?;
            let db = Database::open(&config.db_path)?;
            demo(&db, &co2, &sea_level)?;
            db
        }
        Commands::Import => {
            let (co2, sea_level) = load_datasets(&config)?;
            let db = Database::open(&config.db_path)?;
            import(&db, &co2, &sea_level)?;
            println!(
                "Database now holds {} CO2 rows and {} sea level rows",
                db.count_co2()?,
                db.count_sea_level()?
            );
            db
        }
        Commands::FindCo2 { year, month, json } => {
            let db = Database::open(&config.db_path)?;
            print_co2(db.find_co2(*year, *month)?, *json)?;
            db
        }
        Commands::FindSeaLevel { date, json } => {
            let db = Database::open(&config.db_path)?;
            print_sea_level(db.find_sea_level(date)?, *json)?;
            db
        }
        Commands::DeleteCo2 { key } => {
            let db = Database::open(&config.db_path)?;
            db.delete_co2(key)?;
            db
        }
        Commands::DeleteSeaLevel { date } => {
            let db = Database::open(&config.db_path)?;
            db.delete_sea_level(date)?;
            db
        }
    };

    db.close()
}

/// Read and parse both source files
fn load_datasets(config: &AppConfig) -> Result<(Co2Readings, SeaLevelReadings)> {
    let html = read_source(&config.co2_path)?;
    let co2 = parse_co2(&html)
        .with_context(|| format!("Failed to parse CO2 data: {:?}", config.co2_path))?;

    let csv = read_source(&config.sea_level_path)?;
    let sea_level = parse_sea_level(&csv)
        .with_context(|| format!("Failed to parse sea level data: {:?}", config.sea_level_path))?;

    info!(
        co2 = co2.len(),
        sea_level = sea_level.len(),
        "Loaded datasets"
    );
    Ok((co2, sea_level))
}

fn read_source(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {path:?}"))
}

/// Create tables, insert both datasets and commit
fn import(db: &Database, co2: &Co2Readings, sea_level: &SeaLevelReadings) -> Result<()> {
    db.initialize()?;
    db.insert_co2(co2)?;
    db.insert_sea_level(sea_level)?;
    db.commit()?;
    println!("\nData imported to database!");
    Ok(())
}

/// The fixed import, look up, delete sequence over already parsed datasets
fn demo(db: &Database, co2: &Co2Readings, sea_level: &SeaLevelReadings) -> Result<()> {
    println!("CO2 Data:");
    if co2.is_empty() {
        println!("No CO2 data found.");
    } else {
        println!("CO2 data successfully found.");
        println!("{}", co2.len());
    }

    import(db, co2, sea_level)?;

    let (year, month) = DEMO_CO2_KEY;
    print_co2(db.find_co2(year, month)?, false)?;
    print_sea_level(db.find_sea_level(DEMO_SEA_LEVEL_DATE)?, false)?;

    db.delete_co2(&format!("{year}-{month:02}"))?;
    db.delete_sea_level(DEMO_SEA_LEVEL_DATE)?;
    Ok(())
}

fn print_co2(record: Option<Co2Record>, json: bool) -> Result<()> {
    match record {
        Some(record) if json => println!("{}", serde_json::to_string(&record)?),
        Some(record) => {
            let r = &record.reading;
            println!("CO2 data found:");
            println!("{}", record.year);
            println!("{}", record.month);
            println!("{}", fmt_real(r.decimal));
            println!("{}", fmt_real(r.average));
            println!("{}", fmt_real(r.interpolated));
            println!("{}", fmt_real(r.trend));
            println!("{}", r.days);
        }
        None => println!("No matching CO2 data found."),
    }
    Ok(())
}

fn print_sea_level(record: Option<SeaLevelRecord>, json: bool) -> Result<()> {
    match record {
        Some(record) if json => println!("{}", serde_json::to_string(&record)?),
        Some(record) => {
            println!("Sea level data found:");
            println!("{record}");
        }
        None => println!("No matching sea level data found."),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    const CO2_HTML: &str = r#"<html><body><table summary="csv2html program output">
<tr><td>header</td></tr>
<tr><td>metadata</td></tr>
<tr><td>units</td></tr>
<tr><td>1959</td><td>1</td><td>1959.042</td><td>315.62</td><td>314.70</td><td>315.29</td><td>22</td></tr>
<tr><td>1959</td><td>2</td><td>1959.125</td><td>316.38</td><td>315.43</td><td>315.68</td><td>20</td></tr>
</table></body></html>"#;

    const SEA_LEVEL_CSV: &str =
        "title\nsource\nunits\nyear,TOPEX/Poseidon,Jason-1\n1992.9614,5.916,5.916\n1993.0156,1.421,\n";

    fn write_inputs(dir: &Path) -> AppConfig {
        let co2_path = dir.join("Co2.html");
        let sea_level_path = dir.join("SeaLevel.csv");
        std::fs::write(&co2_path, CO2_HTML).unwrap();
        std::fs::write(&sea_level_path, SEA_LEVEL_CSV).unwrap();
        AppConfig {
            co2_path,
            sea_level_path,
            db_path: dir.join("climate.db"),
            command: Commands::Demo,
        }
    }

    #[test]
    fn test_demo_removes_sample_rows() {
        let dir = tempfile::tempdir().unwrap();
        let config = write_inputs(dir.path());
        run(config.clone()).unwrap();

        let db = Database::open(&config.db_path).unwrap();
        assert!(db.find_co2(1959, 1).unwrap().is_none());
        assert!(db.find_co2(1959, 2).unwrap().is_some());
        assert!(db.find_sea_level(DEMO_SEA_LEVEL_DATE).unwrap().is_none());
        assert!(db.find_sea_level("1993.0156").unwrap().is_some());
    }

    #[test]
    fn test_import_keeps_every_row() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = write_inputs(dir.path());
        config.command = Commands::Import;
        run(config.clone()).unwrap();
        run(config.clone()).unwrap();

        // Repeated imports append rather than replace
        let db = Database::open(&config.db_path).unwrap();
        assert_eq!(db.count_co2().unwrap(), 4);
        assert_eq!(db.count_sea_level().unwrap(), 4);

        let record = db.find_co2(1959, 1).unwrap().unwrap();
        assert_eq!(record.reading.days, 22);
    }

    #[test]
    fn test_missing_input_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            co2_path: PathBuf::from("does/not/exist.html"),
            sea_level_path: PathBuf::from("does/not/exist.csv"),
            db_path: dir.path().join("climate.db"),
            command: Commands::Demo,
        };
        let err = run(config.clone()).unwrap_err();
        assert!(err.to_string().contains("Failed to read file"));
        assert!(!config.db_path.exists());

        let mut config = config;
        config.command = Commands::Import;
        assert!(run(config.clone()).is_err());
        assert!(!config.db_path.exists());
    }

    #[test]
    fn test_parse_failure_is_reported_with_path() {
        let dir = tempfile::tempdir().unwrap();
        let config = write_inputs(dir.path());
        std::fs::write(&config.sea_level_path, "a\nb\nc\nd\n1992.9614,oops\n").unwrap();

        let err = run(config.clone()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse sea level data"));
        assert!(format!("{err:#}").contains("invalid number"));
        assert!(!config.db_path.exists());
    }
}
