use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::pr::github::DEFAULT_API_URL;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Top-level configuration loaded from .pr-files.toml.
/// All fields are optional; the tool works with zero config.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// GitHub-specific settings
    #[serde(default)]
    pub github: GitHubConfig,

    /// File selection settings
    #[serde(default)]
    pub files: FilesConfig,

    /// Local fallback diff settings
    #[serde(default)]
    pub diff: DiffConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GitHubConfig {
    /// GitHub API token. If None, falls back to GITHUB_TOKEN env var.
    pub token: Option<String>,

    /// REST endpoint root, e.g. https://ghe.example.com/api/v3
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Page size requested from the files endpoint (GitHub caps it at 100)
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            token: None,
            api_url: default_api_url(),
            per_page: default_per_page(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FilesConfig {
    /// Regex; changed files whose path matches are skipped
    pub ignore_pattern: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DiffConfig {
    /// Remote whose tracking branches are diffed
    #[serde(default = "default_remote")]
    pub remote: String,

    /// git executable
    #[serde(default = "default_git")]
    pub git: PathBuf,

    /// Maximum concurrent fallback diffs; unset means unbounded
    pub max_concurrency: Option<usize>,
}

impl Default for DiffConfig {
    fn default() -> Self {
        Self {
            remote: default_remote(),
            git: default_git(),
            max_concurrency: None,
        }
    }
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_per_page() -> u32 {
    100
}

fn default_remote() -> String {
    "origin".to_string()
}

fn default_git() -> PathBuf {
    PathBuf::from("git")
}

impl Config {
    /// Load configuration from .pr-files.toml in the current directory.
    /// Returns default config if the file doesn't exist.
    pub fn load() -> Result<Config, ConfigError> {
        let path = Path::new(".pr-files.toml");
        let mut config = if path.exists() {
            Self::load_from(path)?
        } else {
            Config::default()
        };

        if config.github.token.is_none() {
            if let Ok(token) = std::env::var("GITHUB_TOKEN") {
                config.github.token = Some(token);
            }
        }

        Ok(config)
    }

    /// Load from a specific path (useful for testing).
    pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Resolve the GitHub token: config file value takes precedence,
    /// falls back to GITHUB_TOKEN env var.
    pub fn github_token(&self) -> Option<String> {
        self.github
            .token
            .clone()
            .or_else(|| std::env::var("GITHUB_TOKEN").ok())
    }
}
