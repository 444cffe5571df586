//! Console table output

use crate::models::CombinedDataset;
use std::io::{self, Write};

const HEADER: [&str; 8] = [
    "Timestamp",
    "Temperature",
    "latitude",
    "longitude",
    "elevation",
    "date",
    "time",
    "city",
];

/// Write one line per reading followed by a row-count footer
pub fn print_dataset<W: Write>(dataset: &CombinedDataset, out: &mut W) -> io::Result<()> {
    let index_width = dataset.row_count().to_string().len().max(1);

    writeln!(
        out,
        "{:>iw$}  {:<19}  {:>11}  {:>9}  {:>10}  {:>9}  {:<10}  {:<8}  {}",
        "",
        HEADER[0],
        HEADER[1],
        HEADER[2],
        HEADER[3],
        HEADER[4],
        HEADER[5],
        HEADER[6],
        HEADER[7],
        iw = index_width
    )?;

    for (index, reading) in dataset.readings.iter().enumerate() {
        writeln!(
            out,
            "{:>iw$}  {:<19}  {:>11}  {:>9.4}  {:>10.4}  {:>9.1}  {:<10}  {:<8}  {}",
            index,
            reading.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            reading.format_temperature(),
            reading.latitude,
            reading.longitude,
            reading.elevation,
            reading.date().to_string(),
            reading.time().format("%H:%M:%S").to_string(),
            reading.city.as_deref().unwrap_or(""),
            iw = index_width
        )?;
    }

    writeln!(out)?;
    writeln!(out, "[{} rows x {} columns]", dataset.row_count(), HEADER.len())
}
