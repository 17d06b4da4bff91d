use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod display;

use commands::{ConfigCommand, MealCommand, StatsCommand};
use config::Config;
use mealcount_core::{JsonFileBackend, MealHistory};

#[derive(Parser)]
#[command(name = "mealcount")]
#[command(version)]
#[command(about = "Look up meal calories and keep a history of what you ate", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Calculate, list and manage recorded meals
    Meal(MealCommand),

    /// Show analytics for the meal history
    Stats(StatsCommand),

    /// Manage configuration
    Config(ConfigCommand),
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mealcount=warn,mealcount_core=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Save config path for init command
    let cli_config_path = cli.config.clone();

    let config = Config::load(cli.config)?;
    tracing::debug!(data_dir = %config.data_dir.value.display(), "configuration loaded");

    match cli.command {
        Some(Commands::Meal(cmd)) => {
            let mut history = open_history(&config);
            cmd.run(&mut history, &config).await?;
        }
        Some(Commands::Stats(cmd)) => {
            let history = open_history(&config);
            cmd.run(&history)?;
        }
        Some(Commands::Config(cmd)) => {
            cmd.run(&config, cli_config_path)?;
        }
        None => {
            println!("Use --help to see available commands");
        }
    }

    Ok(())
}

fn open_history(config: &Config) -> MealHistory<JsonFileBackend> {
    MealHistory::open(JsonFileBackend::new(config.data_dir.value.clone()))
}
