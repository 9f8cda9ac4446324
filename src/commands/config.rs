use anyhow::{bail, Context, Result};
use clap::ArgMatches;
use colored::Colorize;
use std::path::Path;

use crate::core::config::{AppConfig, CONFIG_KEYS};
use crate::ui::prompts;

pub fn execute(matches: &ArgMatches, config_path: &Path) -> Result<()> {
    match matches.subcommand() {
        Some(("show", _)) => show(config_path),
        Some(("path", _)) => {
            println!("{}", config_path.display());
            Ok(())
        }
        Some(("reset", _)) => reset(config_path),
        Some(("set", sub_matches)) => set(sub_matches, config_path),
        _ => {
            println!("Use 'resmon config --help' for more information.");
            Ok(())
        }
    }
}

fn show(config_path: &Path) -> Result<()> {
    let config = AppConfig::load(config_path);
    let source = if config_path.exists() {
        config_path.display().to_string()
    } else {
        format!("{} (not created yet, showing defaults)", config_path.display())
    };

    println!("{}", "Configuration".cyan().bold());
    prompts::dimmed(&source);
    for key in CONFIG_KEYS {
        if let Some(value) = config.get(key) {
            println!("  {:<20} {}", key.bold(), value);
        }
    }
    Ok(())
}

fn reset(config_path: &Path) -> Result<()> {
    AppConfig::default()
        .save(config_path)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;
    prompts::success("✓ Configuration reset to defaults");
    Ok(())
}

fn set(matches: &ArgMatches, config_path: &Path) -> Result<()> {
    let key = matches.get_one::<String>("key").context("Key argument is required")?;
    let value = matches
        .get_one::<String>("value")
        .context("Value argument is required")?;

    if !CONFIG_KEYS.contains(&key.as_str()) {
        bail!("Unknown key '{}' (valid keys: {})", key, CONFIG_KEYS.join(", "));
    }

    let mut config = AppConfig::load(config_path);
    config.set(key, value)?;
    config
        .save(config_path)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;

    prompts::success(&format!("✓ {} set to {}", key, value.trim()));
    Ok(())
}
