//! Configuration management with YAML support

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub credentials: Option<CredentialsConfig>,
}

/// KF6 server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_url")]
    pub url: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Login credentials
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialsConfig {
    pub username: String,
    pub password: String,
}

// Default value functions
fn default_server_url() -> String {
    "https://kf6.ikit.org".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            url: default_server_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    /// Searches in order:
    /// 1. Provided path
    /// 2. ./kf6.yaml (current directory)
    /// 3. ~/.config/kf6/kf6.yaml
    pub fn load(path: &str) -> Result<Self> {
        let search_paths = vec![
            shellexpand::tilde(path).to_string(),
            "kf6.yaml".to_string(),
            shellexpand::tilde("~/.config/kf6/kf6.yaml").to_string(),
        ];

        for search_path in &search_paths {
            if Path::new(search_path).exists() {
                return Self::from_file(Path::new(search_path));
            }
        }

        // No config file found, use defaults
        Ok(Config::default())
    }

    /// Parse a specific YAML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: Config = serde_yaml::from_str(&content)
            .with_context(|| format!("parsing config {}", path.display()))?;
        Ok(config)
    }

    /// Server URL without a trailing slash
    pub fn base_url(&self) -> &str {
        self.server.url.trim_end_matches('/')
    }
}
