//! Client configuration
//!
//! Sources, later ones winning: built-in defaults, an optional YAML file,
//! then `GALLERY_*` environment variables.

use anyhow::{Context, Result};
use gallery_core::SyncPolicy;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const ENV_BASE_URL: &str = "GALLERY_API_URL";
pub const ENV_TIMEOUT_SECS: &str = "GALLERY_TIMEOUT_SECS";
pub const ENV_TOKEN_PATH: &str = "GALLERY_TOKEN_PATH";
pub const ENV_SYNC_POLICY: &str = "GALLERY_SYNC_POLICY";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GalleryConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    /// Where the login token is kept between runs
    pub token_path: PathBuf,
    pub sync_policy: SyncPolicy,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            token_path: default_token_path(),
            sync_policy: SyncPolicy::default(),
        }
    }
}

/// `~/.config/gallery/token`, or `./gallery-token` without a home directory
fn default_token_path() -> PathBuf {
    match std::env::var_os("HOME") {
        Some(home) => {
            let mut path = PathBuf::from(home);
            path.push(".config");
            path.push("gallery");
            path.push("token");
            path
        }
        None => PathBuf::from("gallery-token"),
    }
}

impl GalleryConfig {
    /// Load configuration from a YAML file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let config: GalleryConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config YAML {}", path.display()))?;

        Ok(config)
    }

    /// Defaults, then `path` if given, then the process environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::load_from_file(path)?,
            None => Self::default(),
        };
        let env: HashMap<String, String> = std::env::vars().collect();
        config.with_env(&env)
    }

    /// Apply `GALLERY_*` overrides from `env`
    pub fn with_env(mut self, env: &HashMap<String, String>) -> Result<Self> {
        if let Some(url) = env.get(ENV_BASE_URL) {
            self.base_url = url.clone();
        }
        if let Some(secs) = env.get(ENV_TIMEOUT_SECS) {
            self.timeout_secs = secs
                .parse()
                .with_context(|| format!("{} must be a number of seconds, got {:?}", ENV_TIMEOUT_SECS, secs))?;
        }
        if let Some(path) = env.get(ENV_TOKEN_PATH) {
            self.token_path = PathBuf::from(path);
        }
        if let Some(policy) = env.get(ENV_SYNC_POLICY) {
            self.sync_policy = policy
                .parse()
                .with_context(|| format!("Invalid {}", ENV_SYNC_POLICY))?;
        }
        Ok(self)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
