//! Follow-up actions on a combined dataset
//!
//! Print to the console, plot to an image file, or append into a database
//! table. Nothing runs when the dataset has no rows.

pub mod plot;
pub mod print;
pub mod store;

use crate::config::CityTempConfig;
use crate::models::CombinedDataset;
use crate::{CityTempError, Result};
use std::fmt;
use std::io::Write;
use std::str::FromStr;
use tracing::info;

pub const NO_DATA_MESSAGE: &str =
    "Sorry, there was no data in any of your city requests to process.";

/// What to do with the combined dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Print,
    Plot,
    Store,
}

impl Action {
    pub(crate) fn from_letter(input: &str) -> Option<Self> {
        match input.trim().to_ascii_uppercase().as_str() {
            "A" => Some(Action::Print),
            "B" => Some(Action::Plot),
            "C" => Some(Action::Store),
            _ => None,
        }
    }
}

impl FromStr for Action {
    type Err = CityTempError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "print" => Ok(Action::Print),
            "plot" => Ok(Action::Plot),
            "store" => Ok(Action::Store),
            other => Action::from_letter(other).ok_or_else(|| {
                CityTempError::validation(format!(
                    "Unknown action '{s}'. Must be one of: print, plot, store"
                ))
            }),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Print => write!(f, "print"),
            Action::Plot => write!(f, "plot"),
            Action::Store => write!(f, "store"),
        }
    }
}

/// Run `action` on `dataset`, writing user-facing messages to `out`
///
/// Returns `false` without touching the print, plot or store targets when the
/// dataset is empty.
pub fn run<W: Write>(
    action: Action,
    dataset: &CombinedDataset,
    config: &CityTempConfig,
    out: &mut W,
) -> Result<bool> {
    if dataset.is_empty() {
        info!("No rows to {}, skipping", action);
        writeln!(out, "{NO_DATA_MESSAGE}")?;
        return Ok(false);
    }

    match action {
        Action::Print => print::print_dataset(dataset, out)?,
        Action::Plot => {
            plot::plot_dataset(dataset, &config.plot)?;
            writeln!(
                out,
                "Chart written to {}",
                config.plot.output_path.display()
            )?;
        }
        Action::Store => {
            let rows = store::store_dataset(dataset, &config.storage)?;
            writeln!(out, "{rows} rows have been imported into the database.")?;
        }
    }

    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::SkipReason;
    use crate::models::CitySkip;
    use rstest::rstest;

    #[rstest]
    #[case(Action::Print)]
    #[case(Action::Plot)]
    #[case(Action::Store)]
    fn test_empty_dataset_suppresses_action(#[case] action: Action) {
        let dir = tempfile::tempdir().unwrap();
        let mut config = CityTempConfig::default();
        config.storage.database_path = dir.path().join("temps.db");
        config.plot.output_path = dir.path().join("chart.png");

        let dataset = CombinedDataset {
            readings: Vec::new(),
            skipped: vec![CitySkip {
                city: "Akron".to_string(),
                reason: SkipReason::EmptyHourly,
            }],
        };

        let mut out = Vec::new();
        let ran = run(action, &dataset, &config, &mut out).unwrap();

        assert!(!ran);
        assert_eq!(String::from_utf8(out).unwrap().trim(), NO_DATA_MESSAGE);
        assert!(!config.storage.database_path.exists());
        assert!(!config.plot.output_path.exists());
    }

    #[rstest]
    #[case("print", Action::Print)]
    #[case("PLOT", Action::Plot)]
    #[case("store", Action::Store)]
    #[case("c", Action::Store)]
    fn test_action_from_str(#[case] text: &str, #[case] expected: Action) {
        assert_eq!(text.parse::<Action>().unwrap(), expected);
    }

    #[test]
    fn test_action_from_str_rejects_unknown() {
        assert!("export".parse::<Action>().is_err());
    }
}
