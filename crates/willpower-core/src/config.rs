//! Application configuration management.
//!
//! This module handles loading and saving the application configuration,
//! which includes the API base URL, the token storage backend, and the last
//! used username.
//!
//! Configuration is stored at `~/.config/willpower-forge/config.json`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::api::DEFAULT_BASE_URL;
use crate::auth::{FileTokenStore, KeyringTokenStore, MemoryTokenStore, TokenStore};

/// Application name used for config directory paths
const APP_NAME: &str = "willpower-forge";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Token file name (file backend)
const TOKEN_FILE: &str = "tokens.json";

/// Environment variable overriding the API base URL
pub const API_URL_ENV: &str = "WILLPOWER_API_URL";

/// Where the session token is persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenBackend {
    #[default]
    File,
    Keyring,
    Memory,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub api_base_url: Option<String>,
    #[serde(default)]
    pub token_backend: TokenBackend,
    pub last_username: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path).context("Failed to read config file")?;
            serde_json::from_str(&contents).context("Failed to parse config file")
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME))
    }

    fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE))
    }

    /// API root: environment first, then the config file, then the default.
    pub fn base_url(&self) -> String {
        Self::resolve_base_url(std::env::var(API_URL_ENV).ok(), self.api_base_url.as_deref())
    }

    fn resolve_base_url(env: Option<String>, configured: Option<&str>) -> String {
        env.filter(|url| !url.trim().is_empty())
            .or_else(|| configured.map(str::to_string))
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
    }

    /// Build the configured token storage backend.
    pub fn token_store(&self) -> Result<Box<dyn TokenStore>> {
        let store: Box<dyn TokenStore> = match self.token_backend {
            TokenBackend::File => Box::new(FileTokenStore::new(Self::config_dir()?.join(TOKEN_FILE))),
            TokenBackend::Keyring => Box::new(KeyringTokenStore::new()),
            TokenBackend::Memory => Box::new(MemoryTokenStore::new()),
        };
        Ok(store)
    }
}
