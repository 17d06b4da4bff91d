mod calorie;
mod meal_record;
mod stats;

pub use calorie::{CalorieRequest, CalorieResponse, InvalidRequest};
pub use meal_record::{generate_record_id, MealRecord};
pub use stats::{DailyCalories, MealStats};
