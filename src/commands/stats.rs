use clap::Args;
use mealcount_core::{HistoryBackend, MealHistory, MealStats};
use serde::Serialize;

use super::OutputFormat;
use crate::display::{format_calories, format_number};

/// Width of the longest bar in the daily chart
const BAR_WIDTH: f64 = 30.0;

#[derive(Args)]
pub struct StatsCommand {
    /// Output format
    #[arg(long, short, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

/// Per-dish line of the breakdown table
#[derive(Debug, Serialize, PartialEq)]
struct DishSummary {
    dish_name: String,
    meals: usize,
    total_calories: f64,
}

#[derive(Debug, Serialize)]
struct StatsReport {
    #[serde(flatten)]
    stats: MealStats,
    unique_dishes: usize,
    dishes: Vec<DishSummary>,
}

impl StatsCommand {
    pub fn run<B: HistoryBackend>(
        &self,
        history: &MealHistory<B>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let report = build_report(history);

        match self.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&report)?);
            }
            OutputFormat::Text => print_report(&report),
        }

        Ok(())
    }
}

fn build_report<B: HistoryBackend>(history: &MealHistory<B>) -> StatsReport {
    let totals = history.total_calories_by_dish();
    let dishes = history
        .meal_count_by_dish()
        .into_iter()
        .zip(totals)
        .map(|((name, meals), (_, total_calories))| DishSummary {
            dish_name: name.to_string(),
            meals,
            total_calories,
        })
        .collect();

    StatsReport {
        stats: history.stats(),
        unique_dishes: history.unique_dishes().len(),
        dishes,
    }
}

fn print_report(report: &StatsReport) {
    let stats = &report.stats;
    let most_popular = if stats.most_popular_dish.is_empty() {
        "None"
    } else {
        stats.most_popular_dish.as_str()
    };

    println!("Meal Analytics");
    println!("==============\n");
    println!("Total meals:      {}", format_number(stats.total_meals as i64));
    println!("Total calories:   {}", format_calories(stats.total_calories));
    println!(
        "Average per meal: {}",
        format_calories(stats.average_calories_per_meal)
    );
    println!("Most popular:     {}", most_popular);
    println!("Unique dishes:    {}", report.unique_dishes);

    if !stats.calories_by_day.is_empty() {
        println!("\nRecent days");
        println!("{}", "-".repeat(60));
        let peak = stats
            .calories_by_day
            .iter()
            .map(|d| d.calories)
            .fold(0.0, f64::max);
        for day in &stats.calories_by_day {
            let width = if peak > 0.0 {
                (day.calories / peak * BAR_WIDTH).round() as usize
            } else {
                0
            };
            println!(
                "  {}  {:>10}  {}",
                day.date.format("%a %b %d"),
                format_calories(day.calories),
                "#".repeat(width)
            );
        }
    }

    if !report.dishes.is_empty() {
        println!("\nBy dish");
        println!("{}", "-".repeat(60));
        for dish in &report.dishes {
            println!(
                "  {:<32} {:>4} meal(s) {:>12}",
                dish.dish_name,
                dish.meals,
                format_calories(dish.total_calories)
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mealcount_core::{CalorieResponse, MemoryBackend};

    fn entry(dish: &str, total: f64) -> CalorieResponse {
        CalorieResponse {
            dish_name: dish.to_string(),
            servings: 1.0,
            calories_per_serving: total,
            total_calories: total,
            source: "test".to_string(),
        }
    }

    #[test]
    fn test_report_for_empty_history() {
        let history = MealHistory::open(MemoryBackend::new());
        let report = build_report(&history);

        assert_eq!(report.stats, MealStats::default());
        assert_eq!(report.unique_dishes, 0);
        assert!(report.dishes.is_empty());
    }

    #[test]
    fn test_report_dish_breakdown() {
        let mut history = MealHistory::open(MemoryBackend::new());
        history.add(entry("Rice", 200.0));
        history.add(entry("Beans", 120.0));
        history.add(entry("Rice", 210.0));

        let report = build_report(&history);
        assert_eq!(report.unique_dishes, 2);
        assert_eq!(
            report.dishes,
            vec![
                DishSummary {
                    dish_name: "Rice".to_string(),
                    meals: 2,
                    total_calories: 410.0,
                },
                DishSummary {
                    dish_name: "Beans".to_string(),
                    meals: 1,
                    total_calories: 120.0,
                },
            ]
        );
    }

    #[test]
    fn test_report_json_shape() {
        let mut history = MealHistory::open(MemoryBackend::new());
        history.add(entry("A", 390.0));
        history.add(entry("B", 420.0));

        let json = serde_json::to_value(build_report(&history)).unwrap();
        assert_eq!(json["total_meals"], 2);
        assert_eq!(json["total_calories"], 810.0);
        assert_eq!(json["average_calories_per_meal"], 405.0);
        assert_eq!(json["dishes"].as_array().unwrap().len(), 2);
    }
}
