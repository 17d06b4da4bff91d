use clap::{Args, Subcommand};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use super::OutputFormat;
use crate::config::Config;

const DEFAULT_CONFIG: &str = r#"# mealcount configuration

# Directory for the meal history (default: platform data dir + /mealcount)
# data_dir: ~/.local/share/mealcount

# Calorie lookup service
api:
  # Base URL of the nutrition API; lookups go to <base_url>/get-calories
  # base_url: https://api.example.com
  # Bearer token forwarded with each lookup (or set MEALCOUNT_API_TOKEN)
  # token: your-token
  timeout_secs: 30
"#;

#[derive(Args)]
pub struct ConfigCommand {
    #[command(subcommand)]
    pub command: ConfigSubcommand,
}

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Show current configuration values
    Show {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Initialize configuration file
    Init,
}

impl ConfigCommand {
    pub fn run(
        &self,
        config: &Config,
        cli_config_path: Option<PathBuf>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            ConfigSubcommand::Show { format } => {
                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(config)?);
                    }
                    OutputFormat::Text => print_config(config),
                }
                Ok(())
            }

            ConfigSubcommand::Init => {
                let config_path = cli_config_path.unwrap_or_else(Config::default_config_path);

                if write_default_config(&config_path)? {
                    println!("Created config file: {}", config_path.display());
                    println!("\nEdit this file to customize your settings.");
                } else {
                    println!("Config file already exists: {}", config_path.display());
                    println!("Use 'mealcount config show' to view current configuration.");
                }
                Ok(())
            }
        }
    }
}

fn print_config(config: &Config) {
    println!("Configuration");
    println!("=============\n");

    if let Some(path) = &config.config_file {
        println!("Config file: {}", path.display());
    } else {
        println!(
            "Config file: {} (not found)",
            Config::default_config_path().display()
        );
    }
    println!();

    println!("data_dir: {}", config.data_dir.value.display());
    println!("  source: {}", config.data_dir.source);
    println!();

    match &config.api.base_url {
        Some(url) => println!("api.base_url: {}", url),
        None => println!("api.base_url: (not set)"),
    }
    let token = if config.api.token.is_some() {
        "(set)"
    } else {
        "(not set)"
    };
    println!("api.token: {}", token);
    println!("api.timeout_secs: {}", config.api.timeout_secs);
}

/// Writes the commented default config to `path`.
///
/// Returns false without touching anything if the file already exists.
fn write_default_config(path: &Path) -> io::Result<bool> {
    if path.exists() {
        return Ok(false);
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut file = fs::File::create(path)?;
    file.write_all(DEFAULT_CONFIG.as_bytes())?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config_loads() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("nested").join("config.yaml");

        assert!(write_default_config(&path).unwrap());

        let config = Config::load(Some(path.clone())).unwrap();
        assert_eq!(config.config_file, Some(path));
        assert_eq!(config.api.timeout_secs, 30);
    }

    #[test]
    fn test_init_does_not_overwrite() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("config.yaml");
        fs::write(&path, "data_dir: /keep/me\n").unwrap();

        assert!(!write_default_config(&path).unwrap());
        assert_eq!(fs::read_to_string(&path).unwrap(), "data_dir: /keep/me\n");
    }
}
