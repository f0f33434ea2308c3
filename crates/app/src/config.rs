use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::cli::CliArgs;
use crate::services::FleetSettings;

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(default)]
pub struct Config {
    pub version: u32,
    pub base_dir: PathBuf,
    pub concurrency: usize,
    pub timeout_secs: u64,
    pub kill_on_timeout: bool,
    pub discovery: DiscoveryConfig,
    pub clone: CloneConfig,
    pub fetch: FetchConfig,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(default)]
pub struct DiscoveryConfig {
    /// How many directory levels below `base_dir` to search
    pub max_depth: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Default)]
#[serde(default)]
pub struct CloneConfig {
    pub depth: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(default)]
pub struct FetchConfig {
    pub prune: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: 1,
            base_dir: dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")),
            concurrency: 8,
            timeout_secs: 60,
            kill_on_timeout: false,
            discovery: DiscoveryConfig::default(),
            clone: CloneConfig::default(),
            fetch: FetchConfig::default(),
        }
    }
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self { max_depth: Some(4) }
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self { prune: true }
    }
}

pub fn get_default_config_path() -> Result<PathBuf> {
    let proj_dirs = ProjectDirs::from("", "", "gitfleet")
        .context("Failed to determine project directories")?;

    let config_dir = proj_dirs.config_dir();
    Ok(config_dir.join("gitfleet.toml"))
}

impl Config {
    pub fn load(config_path: Option<PathBuf>) -> Result<Self> {
        let path = match config_path {
            Some(p) => p,
            None => get_default_config_path()?,
        };

        if !path.exists() {
            let default_config = Config::default();
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)
                    .context("Failed to create config directory")?;
            }
            default_config.save(&path)?;
            return Ok(default_config);
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    pub fn save<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        let contents = toml::to_string_pretty(self)
            .context("Failed to serialize config to TOML")?;

        fs::write(&path, contents)
            .with_context(|| format!("Failed to write config file: {}", path.as_ref().display()))?;

        Ok(())
    }

    pub fn from_cli_and_file(cli_args: &CliArgs) -> Result<Self> {
        let mut config = Self::load(cli_args.config.clone())?;

        // CLI args override config file
        if let Some(base_dir) = &cli_args.base_dir {
            config.base_dir = base_dir.clone();
        }
        if let Some(concurrency) = cli_args.concurrency {
            config.concurrency = concurrency;
        }
        if let Some(timeout) = cli_args.timeout {
            config.timeout_secs = timeout;
        }
        if cli_args.kill_on_timeout {
            config.kill_on_timeout = true;
        }

        Ok(config)
    }

    pub fn fleet_settings(&self) -> FleetSettings {
        FleetSettings {
            concurrency: self.concurrency,
            timeout: Duration::from_secs(self.timeout_secs),
            kill_on_timeout: self.kill_on_timeout,
        }
    }
}
