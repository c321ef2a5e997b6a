use anyhow::{Context, Result};
use clap::ArgMatches;
use colored::Colorize;
use serde_json::Value;

use crate::core::Config;

pub fn execute(matches: &ArgMatches) -> Result<()> {
    match matches.subcommand() {
        Some(("get", sub_matches)) => handle_get(sub_matches),
        Some(("set", sub_matches)) => handle_set(sub_matches),
        Some(("reset", _)) => handle_reset(),
        Some(("path", _)) => handle_path(),
        Some(("show", _)) => handle_show(),
        _ => {
            println!("Use 'resmon config --help' for more information.");
            Ok(())
        }
    }
}

/// Plain strings print without JSON quotes
fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn handle_get(matches: &ArgMatches) -> Result<()> {
    let key = matches
        .get_one::<String>("key")
        .context("Key argument is required")?;

    let config = Config::load();
    match config.get(key) {
        Some(value) if value.is_object() => {
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        Some(value) => println!("{}", display_value(&value).cyan().bold()),
        None => {
            println!("{}", format!("✗ Unknown configuration key '{}'", key).red());
            println!(
                "{}",
                "Run 'resmon config show' to list the available keys.".dimmed()
            );
        }
    }
    Ok(())
}

fn handle_set(matches: &ArgMatches) -> Result<()> {
    let key = matches
        .get_one::<String>("key")
        .context("Key argument is required")?;
    let raw = matches
        .get_one::<String>("value")
        .context("Value argument is required")?;

    let mut config = Config::load();
    config.set(key, raw)?;
    config.save()?;

    // Show the stored value, which may have been clamped
    let stored = config.get(key).map(|v| display_value(&v)).unwrap_or_default();
    println!("{} {}", format!("✓ {} set to:", key).green(), stored);
    Ok(())
}

fn handle_reset() -> Result<()> {
    let mut config = Config::load();
    config.reset_to_defaults();
    config.save()?;

    println!("{}", "✓ Configuration reset to defaults".green());
    Ok(())
}

fn handle_path() -> Result<()> {
    let path = Config::config_path()?;
    println!("{}", path.display());
    if !path.exists() {
        println!("{}", "(not created yet, defaults are in use)".dimmed());
    }
    Ok(())
}

fn handle_show() -> Result<()> {
    let config = Config::load();
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}
