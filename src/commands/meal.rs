use chrono::{Local, NaiveDate, Utc};
use clap::{Args, Subcommand, ValueEnum};
use mealcount_core::history::query;
use mealcount_core::{HttpCalorieLookup, JsonFileBackend, LookupError, MealHistory, MealRecord};
use std::collections::HashSet;
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;

use super::OutputFormat;
use crate::config::Config;
use crate::display::{format_calories, time_ago, CalorieLevel};

/// Smallest serving count accepted on the command line
const MIN_SERVINGS: f64 = 0.1;

#[derive(Clone, Copy, ValueEnum, Default)]
pub enum Period {
    #[default]
    All,
    Today,
    Week,
    Month,
}

#[derive(Args)]
pub struct MealCommand {
    #[command(subcommand)]
    pub command: MealSubcommand,
}

#[derive(Subcommand)]
pub enum MealSubcommand {
    /// Look up calories for a dish and record the meal
    Calc {
        /// Dish name (e.g., "Grilled Chicken Breast")
        dish: String,

        /// Number of servings (at least 0.1)
        #[arg(long, short, default_value_t = 1.0, value_parser = parse_servings)]
        servings: f64,
    },

    /// View meal history
    History {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Limit to a calendar period
        #[arg(long, short, value_enum, default_value = "all")]
        period: Period,

        /// Start date (YYYY-MM-DD), defaults to 7 days before --to
        #[arg(long)]
        from: Option<String>,

        /// End date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        to: Option<String>,

        /// Only meals whose dish name contains this text
        #[arg(long, short = 'q')]
        search: Option<String>,
    },

    /// Remove a meal by ID
    Remove {
        /// Meal ID
        id: String,
    },

    /// Remove all meals
    Clear {
        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },

    /// Export meal history as CSV
    Export {
        /// Directory to write the file to
        #[arg(long, short, default_value = ".")]
        dir: PathBuf,
    },

    /// Import meals from a JSON file (as written by `history --format json`)
    Import {
        /// Path to the JSON file
        file: PathBuf,
    },
}

impl MealCommand {
    pub async fn run(
        &self,
        history: &mut MealHistory<JsonFileBackend>,
        config: &Config,
    ) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            MealSubcommand::Calc { dish, servings } => {
                self.calculate(dish, *servings, history, config).await
            }
            MealSubcommand::History {
                format,
                period,
                from,
                to,
                search,
            } => self.show_history(format, *period, from, to, search, history),
            MealSubcommand::Remove { id } => {
                if history.remove(id) {
                    println!("Removed meal: {}", id);
                } else {
                    println!("No meal found with ID: {}", id);
                }
                Ok(())
            }
            MealSubcommand::Clear { yes } => self.clear(*yes, history),
            MealSubcommand::Export { dir } => {
                let path = history.export_to_dir(dir)?;
                println!("Exported {} meal(s) to {}", history.len(), path.display());
                Ok(())
            }
            MealSubcommand::Import { file } => {
                let contents = std::fs::read_to_string(file)
                    .map_err(|e| format!("Failed to read '{}': {}", file.display(), e))?;
                let records: Vec<MealRecord> = serde_json::from_str(&contents)
                    .map_err(|e| format!("Invalid meal file '{}': {}", file.display(), e))?;
                let count = records.len();
                history.import(records);
                println!("Imported {} meal(s); history now holds {}", count, history.len());
                Ok(())
            }
        }
    }

    async fn calculate(
        &self,
        dish: &str,
        servings: f64,
        history: &mut MealHistory<JsonFileBackend>,
        config: &Config,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let lookup = lookup_client(config)?;
        let record = history.calculate_and_record(&lookup, dish, servings).await?;

        println!("{}", record);
        println!("Level: {}", CalorieLevel::from_calories(record.total_calories));
        println!();
        println!("Meal ID: {}", record.id);

        Ok(())
    }

    fn show_history(
        &self,
        format: &OutputFormat,
        period: Period,
        from: &Option<String>,
        to: &Option<String>,
        search: &Option<String>,
        history: &MealHistory<JsonFileBackend>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let mut meals = if from.is_some() || to.is_some() {
            let to_date = match to {
                Some(d) => parse_date(d)?,
                None => Local::now().date_naive(),
            };
            let from_date = match from {
                Some(d) => parse_date(d)?,
                None => to_date - chrono::Duration::days(7),
            };
            let (start, end) = query::days_span(from_date, to_date);
            history.meals_by_date_range(start, end)
        } else {
            match period {
                Period::All => history.records().iter().collect(),
                Period::Today => history.today_meals(),
                Period::Week => history.week_meals(),
                Period::Month => history.month_meals(),
            }
        };

        if let Some(q) = search {
            let matches: HashSet<&str> = history
                .search_meals(q)
                .into_iter()
                .map(|r| r.id.as_str())
                .collect();
            meals.retain(|r| matches.contains(r.id.as_str()));
        }

        match format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&meals)?);
            }
            OutputFormat::Text => {
                if meals.is_empty() {
                    println!("No meals found.");
                    return Ok(());
                }

                let now = Utc::now();
                for meal in &meals {
                    println!(
                        "  {:<28} {:>6} x  {:>10}  ({})",
                        meal.dish_name,
                        meal.servings,
                        format_calories(meal.total_calories),
                        CalorieLevel::from_calories(meal.total_calories)
                    );
                    println!(
                        "  {:<28} {} per serving, {}",
                        format!("[{}]", meal.id),
                        format_calories(meal.calories_per_serving),
                        time_ago(meal.timestamp, now)
                    );
                }

                let total: f64 = meals.iter().map(|m| m.total_calories).sum();
                println!("\nTotal: {} meal(s), {}", meals.len(), format_calories(total));
            }
        }

        Ok(())
    }

    fn clear(
        &self,
        yes: bool,
        history: &mut MealHistory<JsonFileBackend>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        if history.is_empty() {
            println!("Meal history is already empty.");
            return Ok(());
        }

        if !yes && !confirm(&format!("Clear all {} meal(s)?", history.len()))? {
            println!("Cancelled.");
            return Ok(());
        }

        history.clear();
        println!("Meal history cleared.");
        Ok(())
    }
}

fn lookup_client(config: &Config) -> Result<HttpCalorieLookup, Box<dyn std::error::Error>> {
    if !config.api.is_configured() {
        return Err(LookupError::NotConfigured.into());
    }

    let base_url = config.api.base_url.clone().unwrap_or_default();
    let mut lookup = HttpCalorieLookup::new(base_url)
        .with_timeout(Duration::from_secs(config.api.timeout_secs))?;
    if let Some(token) = &config.api.token {
        lookup = lookup.with_token(token);
    }
    Ok(lookup)
}

fn parse_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| format!("Invalid date format '{}'. Use YYYY-MM-DD.", value))
}

fn parse_servings(value: &str) -> Result<f64, String> {
    let servings: f64 = value
        .parse()
        .map_err(|_| format!("'{}' is not a number", value))?;
    if !servings.is_finite() || servings < MIN_SERVINGS {
        return Err(format!("Servings must be at least {}", MIN_SERVINGS));
    }
    Ok(servings)
}

fn confirm(prompt: &str) -> io::Result<bool> {
    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}
