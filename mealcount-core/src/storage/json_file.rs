use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::{decode_snapshot, encode_snapshot, HistoryBackend, StorageError, STORAGE_KEY};
use crate::models::MealRecord;

/// Stores the snapshot as `meal-storage.json` inside a data directory.
///
/// Writes go to a temporary sibling file that is then renamed over the
/// snapshot, so a crash mid-write leaves the previous snapshot intact.
#[derive(Clone, Debug)]
pub struct JsonFileBackend {
    data_dir: PathBuf,
}

impl JsonFileBackend {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Returns the full path of the snapshot file.
    pub fn path(&self) -> PathBuf {
        self.data_dir.join(format!("{}.json", STORAGE_KEY))
    }

    /// Checks if a snapshot exists on disk.
    pub fn exists(&self) -> bool {
        self.path().exists()
    }

    fn temp_path(&self) -> PathBuf {
        self.data_dir.join(format!("{}.json.tmp", STORAGE_KEY))
    }
}

impl HistoryBackend for JsonFileBackend {
    fn load(&self) -> Result<Option<Vec<MealRecord>>, StorageError> {
        let path = self.path();

        match fs::read_to_string(&path) {
            Ok(content) => {
                let records = decode_snapshot(&content)
                    .map_err(|e| StorageError::FormatError(path.display().to_string(), e))?;
                tracing::debug!(count = records.len(), path = %path.display(), "loaded meal history");
                Ok(Some(records))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::IoError(path, e)),
        }
    }

    fn save(&self, records: &[MealRecord]) -> Result<(), StorageError> {
        fs::create_dir_all(&self.data_dir)
            .map_err(|e| StorageError::IoError(self.data_dir.clone(), e))?;

        let path = self.path();
        let content = encode_snapshot(records)
            .map_err(|e| StorageError::FormatError(path.display().to_string(), e))?;

        let temp = self.temp_path();
        fs::write(&temp, content).map_err(|e| StorageError::IoError(temp.clone(), e))?;
        fs::rename(&temp, &path).map_err(|e| StorageError::IoError(path.clone(), e))?;

        tracing::debug!(count = records.len(), path = %path.display(), "saved meal history");
        Ok(())
    }
}
