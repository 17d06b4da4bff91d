//! CSV export of the meal history.
//!
//! Fields are quoted by the CSV writer when needed, so a dish name
//! containing a comma or quote survives a round trip.

use chrono::NaiveDate;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::models::MealRecord;

pub const CSV_HEADER: [&str; 6] = [
    "Date",
    "Dish Name",
    "Servings",
    "Calories per Serving",
    "Total Calories",
    "Source",
];

/// `meal-history-<YYYY-MM-DD>.csv`
pub fn export_file_name(date: NaiveDate) -> String {
    format!("meal-history-{}.csv", date.format("%Y-%m-%d"))
}

/// Writes a header row and one row per record.
///
/// The Date column holds the record's local calendar date.
pub fn write_csv<W: io::Write>(records: &[MealRecord], writer: W) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(CSV_HEADER)?;

    for record in records {
        wtr.write_record([
            record.local_date().format("%Y-%m-%d").to_string(),
            record.dish_name.clone(),
            record.servings.to_string(),
            record.calories_per_serving.to_string(),
            record.total_calories.to_string(),
            record.source.clone(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Writes the export file for `date` into `dir`, creating the directory if
/// needed.
pub fn export_to_dir(
    records: &[MealRecord],
    dir: &Path,
    date: NaiveDate,
) -> Result<PathBuf, csv::Error> {
    fs::create_dir_all(dir)?;
    let path = dir.join(export_file_name(date));
    let file = fs::File::create(&path)?;
    write_csv(records, file)?;

    tracing::info!(count = records.len(), path = %path.display(), "exported meal history");
    Ok(path)
}
