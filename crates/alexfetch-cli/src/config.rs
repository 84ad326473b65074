//! Configuration loading from TOML files

use std::path::{Path, PathBuf};
use std::time::Duration;

use alexfetch_core::{HttpConfig, RetryPolicy};
use alexfetch_openalex::{ClientConfig, DEFAULT_BASE_URL, DEFAULT_PER_PAGE};
use anyhow::{Context, Result};
use serde::Deserialize;

/// Global configuration for alexfetch
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub http: HttpSection,
    pub seeds: SeedsConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub per_page: u32,
    /// Polite-pool contact; `${VAR}` is expanded from the environment
    #[serde(deserialize_with = "deserialize_env_var")]
    pub mailto: Option<String>,
    pub user_agent: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            per_page: DEFAULT_PER_PAGE,
            mailto: std::env::var("OPENALEX_MAILTO").ok(),
            user_agent: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct HttpSection {
    /// Whole-request timeout in seconds
    pub timeout: u64,
    /// Connect timeout in seconds
    pub connect_timeout: u64,
    /// Retries per page for transient failures (0 = fail fast)
    pub max_retries: u32,
    /// First backoff delay in milliseconds, doubled per retry
    pub retry_base_ms: u64,
}

impl Default for HttpSection {
    fn default() -> Self {
        Self {
            timeout: 60,
            connect_timeout: 30,
            max_retries: 0,
            retry_base_ms: 2000,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct SeedsConfig {
    /// Seeds fetched at once by `references` (1 = sequential)
    pub concurrency: usize,
}

impl Default for SeedsConfig {
    fn default() -> Self {
        Self { concurrency: 1 }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub compression_level: i32,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            compression_level: 3,
        }
    }
}

/// Deserialize a string that may contain environment variable reference like ${VAR}
fn deserialize_env_var<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    Ok(opt.and_then(|s| expand_env_var(&s)))
}

/// Expand ${VAR} to environment variable value
fn expand_env_var(s: &str) -> Option<String> {
    if let Some(var_name) = s.strip_prefix("${").and_then(|s| s.strip_suffix('}')) {
        std::env::var(var_name).ok()
    } else {
        Some(s.to_string())
    }
}

impl Config {
    /// Load configuration from default locations
    ///
    /// Search order:
    /// 1. ./alexfetch.toml (current directory)
    /// 2. ~/.config/alexfetch/config.toml
    ///
    /// If no config file found, returns default config.
    pub fn load() -> Result<Self> {
        let local_config = PathBuf::from("alexfetch.toml");
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        if let Some(config_dir) = directories::ProjectDirs::from("", "", "alexfetch") {
            let user_config = config_dir.config_dir().join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        log::debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Load configuration from a specific file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.http.max_retries,
            Duration::from_millis(self.http.retry_base_ms),
        )
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            base_url: self.api.base_url.clone(),
            per_page: self.api.per_page,
            mailto: self.api.mailto.clone(),
            retry: self.retry_policy(),
            seed_concurrency: self.seeds.concurrency,
        }
    }

    pub fn http_config(&self) -> HttpConfig {
        let defaults = HttpConfig::default();
        HttpConfig {
            timeout: Duration::from_secs(self.http.timeout),
            connect_timeout: Duration::from_secs(self.http.connect_timeout),
            user_agent: self.api.user_agent.clone().unwrap_or(defaults.user_agent),
        }
    }
}
