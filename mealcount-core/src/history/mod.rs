//! The meal history store and its derived analytics.

mod error;
pub mod query;
mod shared;
mod store;

pub use error::HistoryError;
pub use shared::SharedMealHistory;
pub use store::{MealHistory, MAX_HISTORY};
