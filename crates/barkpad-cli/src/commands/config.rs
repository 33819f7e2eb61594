//! Config command implementation.
//!
//! Manages CLI configuration.

use anyhow::{Context, Result};

use crate::config::{parse_flag, split_labels, Config};

/// Show current configuration.
pub fn show(config: &Config) -> Result<()> {
    println!("Barkpad CLI Configuration");
    println!("{:-<40}", "");

    println!(
        "Seed:           {}",
        config
            .seed
            .map(|s| s.to_string())
            .unwrap_or_else(|| "(random)".to_string())
    );
    println!("Lit:            {}", list_or_none(&config.lit));
    println!("Unlit:          {}", list_or_none(&config.unlit));
    println!("Fast timings:   {}", config.fast);

    if let Some(config_path) = Config::config_file_path() {
        println!("\nConfig file: {}", config_path.display());
    }

    Ok(())
}

/// Set a configuration value.
pub fn set(config: &mut Config, key: &str, value: &str) -> Result<()> {
    match key {
        "seed" => {
            config.seed = if value == "random" || value.is_empty() {
                None
            } else {
                Some(
                    value
                        .parse()
                        .with_context(|| format!("Invalid seed: {value}"))?,
                )
            };
            println!("Set seed to: {}", value);
        }
        "lit" => {
            config.lit = split_labels(value);
            println!("Set lit to: {}", list_or_none(&config.lit));
        }
        "unlit" => {
            config.unlit = split_labels(value);
            println!("Set unlit to: {}", list_or_none(&config.unlit));
        }
        "fast" => {
            config.fast = parse_flag(value);
            println!("Set fast to: {}", config.fast);
        }
        _ => {
            anyhow::bail!(
                "Unknown config key: {}. Valid keys: seed, lit, unlit, fast",
                key
            );
        }
    }

    // Reject label names before they reach the file
    config.indicator_set()?;
    config.save()?;
    Ok(())
}

/// Get a configuration value.
pub fn get(config: &Config, key: &str) -> Result<()> {
    let value = match key {
        "seed" => config
            .seed
            .map(|s| s.to_string())
            .unwrap_or_else(|| "(random)".to_string()),
        "lit" => list_or_none(&config.lit),
        "unlit" => list_or_none(&config.unlit),
        "fast" => config.fast.to_string(),
        _ => {
            anyhow::bail!("Unknown config key: {}", key);
        }
    };

    println!("{}", value);
    Ok(())
}

/// Reset configuration to defaults.
pub fn reset() -> Result<()> {
    let config = Config::default();
    config.save()?;
    println!("Configuration reset to defaults");
    Ok(())
}

fn list_or_none(labels: &[String]) -> String {
    if labels.is_empty() {
        "(none)".to_string()
    } else {
        labels.join(",")
    }
}
