//! mealcount core library
//!
//! Meal history store, analytics, CSV export and the calorie lookup client
//! shared by mealcount front ends.

pub mod export;
pub mod history;
pub mod lookup;
pub mod models;
pub mod storage;

pub use history::{HistoryError, MealHistory, SharedMealHistory, MAX_HISTORY};
pub use lookup::{CalorieLookup, HttpCalorieLookup, LookupError};
pub use models::{
    CalorieRequest, CalorieResponse, DailyCalories, InvalidRequest, MealRecord, MealStats,
};
pub use storage::{HistoryBackend, JsonFileBackend, MemoryBackend, StorageError};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
