//! CLI configuration management.
//!
//! Values come from a `.env` file, `BARKPAD_*` environment variables and a
//! JSON config file. Environment variables win over the file; command-line
//! flags win over both.

use std::path::PathBuf;

use anyhow::{Context, Result};
use barkpad_core::{IndicatorSet, LabelId};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

/// Overrides the directory holding `config.json`.
pub const CONFIG_DIR_ENV: &str = "BARKPAD_CONFIG_DIR";

/// Host-side settings for solving and playing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Seed for layout sampling. Unset means fresh entropy every run.
    pub seed: Option<u64>,

    /// Standard indicators present and lit on the host.
    pub lit: Vec<String>,

    /// Standard indicators present but unlit on the host.
    pub unlit: Vec<String>,

    /// Shortened presentation delays.
    pub fast: bool,
}

impl Config {
    /// Load configuration from environment variables and config file.
    pub fn load() -> Result<Self> {
        // Load .env file if present (silently ignore if missing)
        let _ = dotenvy::dotenv();

        let mut config = Self::default();
        let mut fast_from_env = false;

        if let Ok(seed) = std::env::var("BARKPAD_SEED") {
            config.seed = Some(
                seed.trim()
                    .parse()
                    .with_context(|| format!("BARKPAD_SEED is not a number: {seed}"))?,
            );
        }
        if let Ok(lit) = std::env::var("BARKPAD_LIT") {
            config.lit = split_labels(&lit);
        }
        if let Ok(unlit) = std::env::var("BARKPAD_UNLIT") {
            config.unlit = split_labels(&unlit);
        }
        if let Ok(fast) = std::env::var("BARKPAD_FAST") {
            config.fast = parse_flag(&fast);
            fast_from_env = true;
        }

        if let Some(config_path) = Self::config_file_path() {
            if config_path.exists() {
                let contents = std::fs::read_to_string(&config_path).with_context(|| {
                    format!("Failed to read config from {}", config_path.display())
                })?;
                let file_config: Config = serde_json::from_str(&contents)
                    .with_context(|| "Failed to parse config file")?;

                // File config takes lower precedence than env vars
                if config.seed.is_none() {
                    config.seed = file_config.seed;
                }
                if std::env::var_os("BARKPAD_LIT").is_none() {
                    config.lit = file_config.lit;
                }
                if std::env::var_os("BARKPAD_UNLIT").is_none() {
                    config.unlit = file_config.unlit;
                }
                if !fast_from_env {
                    config.fast = file_config.fast;
                }
            }
        }

        Ok(config)
    }

    /// Apply command-line flags on top of the loaded values.
    pub fn with_overrides(
        mut self,
        seed: Option<u64>,
        lit: Vec<String>,
        unlit: Vec<String>,
        fast: bool,
    ) -> Self {
        if seed.is_some() {
            self.seed = seed;
        }
        if !lit.is_empty() {
            self.lit = lit;
        }
        if !unlit.is_empty() {
            self.unlit = unlit;
        }
        self.fast |= fast;
        self
    }

    /// Host indicator facts described by `lit` and `unlit`.
    pub fn indicator_set(&self) -> Result<IndicatorSet> {
        let mut set = IndicatorSet::new();
        for name in &self.lit {
            set = set.with_lit(parse_standard(name)?);
        }
        for name in &self.unlit {
            set = set.with_unlit(parse_standard(name)?);
        }
        Ok(set)
    }

    /// Save current configuration to the config file.
    pub fn save(&self) -> Result<()> {
        if let Some(config_path) = Self::config_file_path() {
            if let Some(parent) = config_path.parent() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create config directory: {}", parent.display())
                })?;
            }
            let contents = serde_json::to_string_pretty(self)?;
            std::fs::write(&config_path, contents)
                .with_context(|| format!("Failed to write config to {}", config_path.display()))?;
        }
        Ok(())
    }

    /// Get the path to the config file.
    pub fn config_file_path() -> Option<PathBuf> {
        if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV) {
            return Some(PathBuf::from(dir).join("config.json"));
        }
        ProjectDirs::from("dev", "barkpad", "barkpad")
            .map(|dirs| dirs.config_dir().join("config.json"))
    }
}

/// Split a comma or whitespace separated label list.
pub fn split_labels(value: &str) -> Vec<String> {
    value
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_ascii_uppercase())
        .collect()
}

/// `1`, `true`, `yes` and `on` enable a flag.
pub fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

fn parse_standard(name: &str) -> Result<LabelId> {
    let label: LabelId = name
        .parse()
        .with_context(|| format!("Unknown indicator: {name}"))?;
    if !label.is_standard() {
        anyhow::bail!("{label} has a fixed status and cannot be set as a host indicator");
    }
    Ok(label)
}
