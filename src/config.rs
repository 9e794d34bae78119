// Configuration loading.
// Reads an optional TOML file, then applies environment overrides.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TimelineError};
use crate::github::{GITHUB_API_BASE, MAX_PER_PAGE};
use crate::loc::LOC_API_BASE;

const ACCOUNT_ENV: &str = "GHTIMELINE_ACCOUNT";
const TOKEN_ENV: &str = "GITHUB_TOKEN";

/// Runtime configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// GitHub account whose repositories make up the timeline.
    pub account: String,
    pub user_agent: String,
    pub github_api_base: String,
    pub loc_api_base: String,
    /// Page size for the listing call, capped at 100.
    pub per_page: u32,
    pub cache_ttl_secs: u64,
    /// Repositories enriched at the same time.
    pub max_concurrency: usize,
    /// Optional GitHub token. Never serialized back out.
    #[serde(skip_serializing)]
    pub token: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            account: "caseymanos".to_string(),
            user_agent: "ghtimeline".to_string(),
            github_api_base: GITHUB_API_BASE.to_string(),
            loc_api_base: LOC_API_BASE.to_string(),
            per_page: MAX_PER_PAGE,
            cache_ttl_secs: 24 * 60 * 60,
            max_concurrency: 8,
            token: None,
        }
    }
}

impl Config {
    /// Default config file location (`~/.config/ghtimeline/config.toml` on Linux).
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "ghtimeline").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Parse a TOML file. Missing keys fall back to defaults.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| TimelineError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Load from `path` if given, else from the default location when it exists,
    /// else defaults. Environment overrides are applied last.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::load_from_file(path)?,
            None => match Self::default_path().filter(|p| p.exists()) {
                Some(path) => Self::load_from_file(&path)?,
                None => Self::default(),
            },
        };

        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from a variable lookup (the process environment in production).
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(account) = lookup(ACCOUNT_ENV).filter(|v| !v.is_empty()) {
            self.account = account;
        }
        if let Some(token) = lookup(TOKEN_ENV).filter(|v| !v.is_empty()) {
            self.token = Some(token);
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.account.trim().is_empty() {
            return Err(TimelineError::Config("account must not be empty".to_string()));
        }
        if self.per_page == 0 || self.per_page > MAX_PER_PAGE {
            return Err(TimelineError::Config(format!(
                "per_page must be between 1 and {}",
                MAX_PER_PAGE
            )));
        }
        Ok(())
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    /// TOML rendering of the effective configuration, without the token.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| TimelineError::Config(e.to_string()))
    }
}
