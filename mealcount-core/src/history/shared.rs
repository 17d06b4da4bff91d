use std::sync::Arc;
use tokio::sync::Mutex;

use super::error::HistoryError;
use super::store::MealHistory;
use crate::lookup::CalorieLookup;
use crate::models::{CalorieRequest, CalorieResponse, MealRecord, MealStats};
use crate::storage::HistoryBackend;

/// A [`MealHistory`] behind an async mutex, for use from several tasks.
///
/// Each mutation holds the lock for its whole mutate-then-persist step.
/// `calculate_and_record` awaits the lookup without the lock, so other
/// mutations can proceed while a lookup is pending.
pub struct SharedMealHistory<B: HistoryBackend> {
    inner: Arc<Mutex<MealHistory<B>>>,
}

impl<B: HistoryBackend> Clone for SharedMealHistory<B> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<B: HistoryBackend> SharedMealHistory<B> {
    pub fn new(history: MealHistory<B>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(history)),
        }
    }

    pub async fn add(&self, entry: CalorieResponse) -> MealRecord {
        self.inner.lock().await.add(entry)
    }

    pub async fn remove(&self, id: &str) -> bool {
        self.inner.lock().await.remove(id)
    }

    pub async fn clear(&self) {
        self.inner.lock().await.clear();
    }

    pub async fn import(&self, records: Vec<MealRecord>) {
        self.inner.lock().await.import(records);
    }

    pub async fn calculate_and_record<L: CalorieLookup>(
        &self,
        lookup: &L,
        dish_name: &str,
        servings: f64,
    ) -> Result<MealRecord, HistoryError> {
        let request = CalorieRequest::new(dish_name, servings)?;
        let response = lookup.lookup(&request).await?;
        Ok(self.add(response).await)
    }

    pub async fn stats(&self) -> MealStats {
        self.inner.lock().await.stats()
    }

    /// Copy of the current records, most recent first.
    pub async fn records(&self) -> Vec<MealRecord> {
        self.inner.lock().await.records().to_vec()
    }

    /// Runs `f` against the history while holding the lock.
    pub async fn read<R>(&self, f: impl FnOnce(&MealHistory<B>) -> R) -> R {
        let guard = self.inner.lock().await;
        f(&guard)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::MAX_HISTORY;
    use crate::lookup::LookupError;
    use crate::storage::MemoryBackend;
    use std::time::Duration;
    use tokio::sync::Notify;

    fn entry(dish: &str) -> CalorieResponse {
        CalorieResponse {
            dish_name: dish.to_string(),
            servings: 1.0,
            calories_per_serving: 100.0,
            total_calories: 100.0,
            source: "test".to_string(),
        }
    }

    fn shared() -> SharedMealHistory<MemoryBackend> {
        SharedMealHistory::new(MealHistory::open(MemoryBackend::new()))
    }

    /// Lookup that waits until released, to hold a request in flight.
    struct GatedLookup {
        gate: Arc<Notify>,
    }

    impl CalorieLookup for GatedLookup {
        async fn lookup(&self, request: &CalorieRequest) -> Result<CalorieResponse, LookupError> {
            self.gate.notified().await;
            Ok(CalorieResponse {
                dish_name: request.dish_name.clone(),
                servings: request.servings,
                calories_per_serving: 200.0,
                total_calories: 200.0 * request.servings,
                source: "gated".to_string(),
            })
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_adds_are_atomic() {
        let history = shared();

        let mut handles = Vec::new();
        for task in 0..8 {
            let history = history.clone();
            handles.push(tokio::spawn(async move {
                for i in 0..20 {
                    history.add(entry(&format!("t{}-{}", task, i))).await;
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(history.records().await.len(), MAX_HISTORY);
        let persisted = history
            .read(|h| h.backend().raw().map(|raw| raw.matches("\"id\"").count()))
            .await;
        assert_eq!(persisted, Some(MAX_HISTORY));
    }

    #[tokio::test]
    async fn test_mutations_proceed_while_lookup_pending() {
        let history = shared();
        let gate = Arc::new(Notify::new());
        let lookup = GatedLookup { gate: gate.clone() };

        let pending = {
            let history = history.clone();
            tokio::spawn(async move {
                history
                    .calculate_and_record(&lookup, "Salmon Fillet", 1.5)
                    .await
            })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        history.add(entry("Toast")).await;
        assert_eq!(history.records().await.len(), 1);

        gate.notify_one();
        let record = pending.await.unwrap().unwrap();

        let records = history.records().await;
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, record.id);
        assert_eq!(records[0].total_calories, 300.0);
        assert_eq!(records[1].dish_name, "Toast");
    }

    #[tokio::test]
    async fn test_shared_remove_clear_and_stats() {
        let history = shared();
        let soup = history.add(entry("Soup")).await;
        history.add(entry("Soup")).await;

        assert_eq!(history.stats().await.most_popular_dish, "Soup");
        assert!(history.remove(&soup.id).await);
        assert!(!history.remove(&soup.id).await);

        history.import(vec![soup]).await;
        assert_eq!(history.records().await.len(), 2);

        history.clear().await;
        assert_eq!(history.stats().await, MealStats::default());
    }
}
