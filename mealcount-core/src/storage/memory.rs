use std::sync::{Mutex, MutexGuard};

use super::{decode_snapshot, encode_snapshot, HistoryBackend, StorageError};
use crate::models::MealRecord;

/// In-process backend holding the encoded snapshot in memory.
///
/// A backend built with [`MemoryBackend::unavailable`] rejects every write,
/// standing in for a full or missing storage area.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    snapshot: Mutex<Option<String>>,
    reject_writes: bool,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts with `content` as the stored snapshot text.
    pub fn with_snapshot(content: impl Into<String>) -> Self {
        Self {
            snapshot: Mutex::new(Some(content.into())),
            reject_writes: false,
        }
    }

    pub fn unavailable() -> Self {
        Self {
            snapshot: Mutex::new(None),
            reject_writes: true,
        }
    }

    /// Returns the raw snapshot text, if one has been written.
    pub fn raw(&self) -> Option<String> {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, Option<String>> {
        self.snapshot.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl HistoryBackend for MemoryBackend {
    fn load(&self) -> Result<Option<Vec<MealRecord>>, StorageError> {
        match self.lock().as_deref() {
            Some(content) => decode_snapshot(content)
                .map(Some)
                .map_err(|e| StorageError::FormatError("memory".to_string(), e)),
            None => Ok(None),
        }
    }

    fn save(&self, records: &[MealRecord]) -> Result<(), StorageError> {
        if self.reject_writes {
            return Err(StorageError::Unavailable("quota exceeded".to_string()));
        }

        let content = encode_snapshot(records)
            .map_err(|e| StorageError::FormatError("memory".to_string(), e))?;
        *self.lock() = Some(content);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_backend_loads_none() {
        assert!(MemoryBackend::new().load().unwrap().is_none());
    }

    #[test]
    fn test_save_then_load() {
        let backend = MemoryBackend::new();
        backend.save(&[]).unwrap();

        assert_eq!(backend.load().unwrap(), Some(Vec::new()));
        assert!(backend.raw().unwrap().contains("records"));
    }

    #[test]
    fn test_unavailable_rejects_writes() {
        let backend = MemoryBackend::unavailable();
        assert!(matches!(
            backend.save(&[]),
            Err(StorageError::Unavailable(_))
        ));
        assert!(backend.raw().is_none());
    }
}
