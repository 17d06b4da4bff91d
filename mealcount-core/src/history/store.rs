use chrono::{DateTime, Local, NaiveDate, Utc};
use std::io;
use std::path::{Path, PathBuf};

use super::error::HistoryError;
use super::query;
use crate::export;
use crate::lookup::CalorieLookup;
use crate::models::{CalorieRequest, CalorieResponse, MealRecord, MealStats};
use crate::storage::HistoryBackend;

/// Maximum number of records kept; older ones are evicted on insert.
pub const MAX_HISTORY: usize = 100;

/// The meal history: an ordered, bounded list of records (most recent
/// first) persisted through a [`HistoryBackend`].
///
/// Every mutation rewrites the whole snapshot. A failed write is logged and
/// the in-memory change is kept.
pub struct MealHistory<B: HistoryBackend> {
    backend: B,
    records: Vec<MealRecord>,
}

impl<B: HistoryBackend> MealHistory<B> {
    /// Rehydrates the history from `backend`.
    ///
    /// Starts empty when nothing is stored or the stored snapshot cannot be
    /// read.
    pub fn open(backend: B) -> Self {
        let records = match backend.load() {
            Ok(Some(mut records)) => {
                records.truncate(MAX_HISTORY);
                records
            }
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!(error = %e, "could not load meal history, starting empty");
                Vec::new()
            }
        };

        Self { backend, records }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// All records, most recent first.
    pub fn records(&self) -> &[MealRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&MealRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Records a meal, assigning its id and timestamp.
    pub fn add(&mut self, entry: CalorieResponse) -> MealRecord {
        let record = MealRecord::new(entry);
        self.prepend(vec![record.clone()]);
        record
    }

    /// Removes the record with `id`. Returns false if there was none.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.records.len();
        self.records.retain(|r| r.id != id);
        let removed = self.records.len() != before;
        self.persist();
        removed
    }

    pub fn clear(&mut self) {
        self.records.clear();
        self.persist();
    }

    /// Puts `records` in front of the existing history, keeping their order.
    ///
    /// Ids are not de-duplicated.
    pub fn import(&mut self, records: Vec<MealRecord>) {
        self.prepend(records);
    }

    /// Looks up calories for a dish and records the result.
    ///
    /// Input is validated before the lookup is called. If the lookup fails
    /// the history is left as it was.
    pub async fn calculate_and_record<L: CalorieLookup>(
        &mut self,
        lookup: &L,
        dish_name: &str,
        servings: f64,
    ) -> Result<MealRecord, HistoryError> {
        let request = CalorieRequest::new(dish_name, servings)?;
        let response = lookup.lookup(&request).await?;
        Ok(self.add(response))
    }

    pub fn stats(&self) -> MealStats {
        query::compute_stats(&self.records)
    }

    /// Records with `start <= timestamp <= end`.
    pub fn meals_by_date_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Vec<&MealRecord> {
        query::in_range(&self.records, start, end)
    }

    pub fn meals_on(&self, date: NaiveDate) -> Vec<&MealRecord> {
        let (start, end) = query::days_span(date, date);
        self.meals_by_date_range(start, end)
    }

    pub fn meals_in_week_of(&self, date: NaiveDate) -> Vec<&MealRecord> {
        let (first, last) = query::week_of(date);
        let (start, end) = query::days_span(first, last);
        self.meals_by_date_range(start, end)
    }

    pub fn meals_in_month_of(&self, date: NaiveDate) -> Vec<&MealRecord> {
        let (first, last) = query::month_of(date);
        let (start, end) = query::days_span(first, last);
        self.meals_by_date_range(start, end)
    }

    pub fn today_meals(&self) -> Vec<&MealRecord> {
        self.meals_on(Local::now().date_naive())
    }

    pub fn week_meals(&self) -> Vec<&MealRecord> {
        self.meals_in_week_of(Local::now().date_naive())
    }

    pub fn month_meals(&self) -> Vec<&MealRecord> {
        self.meals_in_month_of(Local::now().date_naive())
    }

    pub fn search_meals(&self, query: &str) -> Vec<&MealRecord> {
        query::search(&self.records, query)
    }

    pub fn unique_dishes(&self) -> Vec<&str> {
        query::unique_dishes(&self.records)
    }

    pub fn meal_count_by_dish(&self) -> Vec<(&str, usize)> {
        query::meal_count_by_dish(&self.records)
    }

    pub fn total_calories_by_dish(&self) -> Vec<(&str, f64)> {
        query::total_calories_by_dish(&self.records)
    }

    /// Writes the history as CSV to `writer`.
    pub fn export_csv<W: io::Write>(&self, writer: W) -> Result<(), csv::Error> {
        export::write_csv(&self.records, writer)
    }

    /// Writes `meal-history-<today>.csv` into `dir` and returns its path.
    pub fn export_to_dir(&self, dir: &Path) -> Result<PathBuf, csv::Error> {
        export::export_to_dir(&self.records, dir, Utc::now().date_naive())
    }

    fn prepend(&mut self, mut records: Vec<MealRecord>) {
        records.append(&mut self.records);
        records.truncate(MAX_HISTORY);
        self.records = records;
        self.persist();
    }

    fn persist(&self) {
        if let Err(e) = self.backend.save(&self.records) {
            tracing::warn!(error = %e, "failed to persist meal history");
        }
    }
}
