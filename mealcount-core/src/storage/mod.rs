//! Persistence for the meal history snapshot.
//!
//! The snapshot is a single JSON object with one field, `records`, holding
//! the full history most-recent-first. Every save overwrites the whole
//! snapshot; there is no versioning.

mod json_file;
mod memory;

pub use json_file::JsonFileBackend;
pub use memory::MemoryBackend;

use serde::{Deserialize, Serialize};
use std::io;
use std::path::PathBuf;

use crate::models::MealRecord;

/// Fixed key the snapshot is stored under.
pub const STORAGE_KEY: &str = "meal-storage";

/// Durable storage the history reads once at startup and rewrites after
/// every mutation.
pub trait HistoryBackend {
    /// Loads the stored records.
    ///
    /// Returns `Ok(None)` when nothing has been stored yet.
    fn load(&self) -> Result<Option<Vec<MealRecord>>, StorageError>;

    /// Replaces the stored snapshot with `records`.
    fn save(&self, records: &[MealRecord]) -> Result<(), StorageError>;
}

#[derive(Serialize)]
struct SnapshotRef<'a> {
    records: &'a [MealRecord],
}

#[derive(Deserialize)]
struct Snapshot {
    records: Vec<MealRecord>,
}

pub(crate) fn encode_snapshot(records: &[MealRecord]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&SnapshotRef { records })
}

pub(crate) fn decode_snapshot(content: &str) -> Result<Vec<MealRecord>, serde_json::Error> {
    let snapshot: Snapshot = serde_json::from_str(content)?;
    Ok(snapshot.records)
}

/// Errors that can occur while reading or writing the snapshot.
#[derive(Debug)]
pub enum StorageError {
    /// I/O error reading or writing a file.
    IoError(PathBuf, io::Error),
    /// The stored snapshot could not be encoded or decoded.
    FormatError(String, serde_json::Error),
    /// The backend refused the operation.
    Unavailable(String),
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageError::IoError(path, e) => {
                write!(f, "I/O error for {}: {}", path.display(), e)
            }
            StorageError::FormatError(location, e) => {
                write!(f, "Invalid meal history snapshot in {}: {}", location, e)
            }
            StorageError::Unavailable(reason) => {
                write!(f, "Storage unavailable: {}", reason)
            }
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StorageError::IoError(_, e) => Some(e),
            StorageError::FormatError(_, e) => Some(e),
            StorageError::Unavailable(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CalorieResponse;

    #[test]
    fn test_snapshot_layout() {
        let record = MealRecord::new(CalorieResponse {
            dish_name: "Toast".to_string(),
            servings: 2.0,
            calories_per_serving: 80.0,
            total_calories: 160.0,
            source: "test".to_string(),
        });

        let encoded = encode_snapshot(std::slice::from_ref(&record)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&encoded).unwrap();
        let object = value.as_object().unwrap();

        assert_eq!(object.len(), 1);
        assert_eq!(object["records"].as_array().unwrap().len(), 1);

        let decoded = decode_snapshot(&encoded).unwrap();
        assert_eq!(decoded, vec![record]);
    }

    #[test]
    fn test_decode_rejects_other_shapes() {
        assert!(decode_snapshot("[]").is_err());
        assert!(decode_snapshot("{\"mealHistory\": []}").is_err());
    }
}
