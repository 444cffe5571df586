//! Append rows into a SQLite table
//!
//! Rows are only ever added; an existing table keeps everything already in it.

use crate::Result;
use crate::config::StorageConfig;
use crate::models::CombinedDataset;
use rusqlite::{Connection, params};
use tracing::{debug, info};

/// Open the database, create the table if needed and append every reading
///
/// Returns the number of rows inserted.
pub fn store_dataset(dataset: &CombinedDataset, config: &StorageConfig) -> Result<usize> {
    let path = config.database_path.as_path();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let mut conn = Connection::open(path)?;
    create_table(&conn, &config.table)?;

    let tx = conn.transaction()?;
    {
        let mut stmt = tx.prepare(&format!(
            "INSERT INTO \"{}\" (Timestamp, Temperature, latitude, longitude, elevation, date, time, city)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            config.table
        ))?;

        for reading in &dataset.readings {
            let temperature = (!reading.temperature.is_nan()).then_some(reading.temperature);
            stmt.execute(params![
                reading.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
                temperature,
                reading.latitude,
                reading.longitude,
                reading.elevation,
                reading.date().to_string(),
                reading.time().format("%H:%M:%S").to_string(),
                reading.city,
            ])?;
        }
    }
    tx.commit()?;

    info!(
        "Appended {} rows to {} in {}",
        dataset.row_count(),
        config.table,
        path.display()
    );
    Ok(dataset.row_count())
}

fn create_table(conn: &Connection, table: &str) -> rusqlite::Result<()> {
    debug!("Ensuring table {} exists", table);
    conn.execute_batch(&format!(
        "CREATE TABLE IF NOT EXISTS \"{table}\" (
            Timestamp   TEXT NOT NULL,
            Temperature REAL,
            latitude    REAL NOT NULL,
            longitude   REAL NOT NULL,
            elevation   REAL NOT NULL,
            date        TEXT NOT NULL,
            time        TEXT NOT NULL,
            city        TEXT
        );"
    ))
}
