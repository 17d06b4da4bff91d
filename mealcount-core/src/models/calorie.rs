use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reasons a calorie request is rejected before it reaches the lookup service.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InvalidRequest {
    #[error("Dish name is required")]
    EmptyDishName,

    #[error("Servings must be a positive number, got {0}")]
    InvalidServings(f64),
}

/// Body sent to the lookup service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalorieRequest {
    pub dish_name: String,
    pub servings: f64,
}

impl CalorieRequest {
    /// Builds a request, trimming the dish name.
    ///
    /// Rejects an empty dish name and servings that are not a finite
    /// number greater than zero.
    pub fn new(dish_name: &str, servings: f64) -> Result<Self, InvalidRequest> {
        let dish_name = dish_name.trim();
        if dish_name.is_empty() {
            return Err(InvalidRequest::EmptyDishName);
        }
        if !servings.is_finite() || servings <= 0.0 {
            return Err(InvalidRequest::InvalidServings(servings));
        }

        Ok(Self {
            dish_name: dish_name.to_string(),
            servings,
        })
    }
}

/// Calorie figures returned by the lookup service.
///
/// This is also the content of a meal record before the store assigns its
/// id and timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalorieResponse {
    pub dish_name: String,
    pub servings: f64,
    pub calories_per_serving: f64,
    pub total_calories: f64,
    pub source: String,
}

impl CalorieResponse {
    /// `calories_per_serving * servings`
    pub fn expected_total(&self) -> f64 {
        self.calories_per_serving * self.servings
    }

    /// Whether `total_calories` matches the per-serving figure times servings.
    pub fn is_consistent(&self) -> bool {
        let expected = self.expected_total();
        let scale = expected.abs().max(self.total_calories.abs()).max(1.0);
        (expected - self.total_calories).abs() <= 1e-6 * scale
    }
}
