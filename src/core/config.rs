use super::rates::CurrencyCode;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://api.privatbank.ua";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// What to do with a day whose response has zero or several records for the currency.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LookupPolicy {
    /// The whole currency is reported as failed.
    #[default]
    FailCurrency,
    /// Only the offending day is dropped.
    SkipDay,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct PrivatBankProviderConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for PrivatBankProviderConfig {
    fn default() -> Self {
        PrivatBankProviderConfig {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub privatbank: PrivatBankProviderConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    #[serde(default = "default_base_currencies")]
    pub base_currencies: Vec<CurrencyCode>,
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default)]
    pub lookup_policy: LookupPolicy,
    #[serde(default)]
    pub parallel_currencies: bool,
}

fn default_base_currencies() -> Vec<CurrencyCode> {
    ["EUR", "USD"]
        .into_iter()
        .filter_map(|code| code.parse().ok())
        .collect()
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            base_currencies: default_base_currencies(),
            providers: ProvidersConfig::default(),
            lookup_policy: LookupPolicy::default(),
            parallel_currencies: false,
        }
    }
}

impl AppConfig {
    /// Loads the default config file if one exists, built-in defaults otherwise.
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!("No config at {}, using defaults", config_path.display());
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("ua", "fxdays", "fxdays")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }
}
