mod config_cmd;
mod meal;
mod stats;

pub use config_cmd::ConfigCommand;
pub use meal::MealCommand;
pub use stats::StatsCommand;

use clap::ValueEnum;

#[derive(Clone, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}
