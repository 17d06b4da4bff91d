use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Calories summed over one local calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyCalories {
    pub date: NaiveDate,
    pub calories: f64,
}

/// Aggregate figures derived from the meal history.
///
/// The default value is what an empty history reports.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MealStats {
    pub total_meals: usize,
    pub total_calories: f64,
    pub average_calories_per_meal: f64,
    pub most_popular_dish: String,
    pub calories_by_day: Vec<DailyCalories>,
}
