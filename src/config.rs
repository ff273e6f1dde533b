use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub db: DbConfig,
    #[serde(default)]
    pub import: ImportConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DbConfig {
    pub path: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ImportConfig {
    /// Stop reporting individual bad blocks after this many failures in
    /// one run; the summary still carries the full count.
    #[serde(default = "default_max_reported_failures")]
    pub max_reported_failures: usize,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            max_reported_failures: default_max_reported_failures(),
        }
    }
}

fn default_max_reported_failures() -> usize {
    20
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    if config.import.max_reported_failures == 0 {
        anyhow::bail!("import.max_reported_failures must be > 0");
    }

    Ok(config)
}
