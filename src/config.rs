//! Server configuration.
//!
//! Loaded from an optional YAML file; every field has a default so an empty
//! file (or none at all) yields a working server. The `LISTEN` environment
//! variable overrides the listen address either way.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::digest::Algorithm;
use crate::http::headers::Headers;

pub const LISTEN_ENV: &str = "LISTEN";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] serde_yaml::Error),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub static_files: StaticFilesConfig,
    pub digest: DigestConfig,
    /// Headers added to every response, e.g. `X-Powered-By`.
    pub extra_headers: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub listen_addr: String,
    /// Idle time allowed between two reads of a request.
    pub read_timeout_secs: u64,
    /// Largest request (head plus body) accepted before replying 413.
    pub max_request_bytes: usize,
    pub keep_alive: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StaticFilesConfig {
    pub index_path: PathBuf,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DigestConfig {
    pub algorithm: Algorithm,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:3000".to_string(),
            read_timeout_secs: 30,
            max_request_bytes: 1024 * 1024,
            keep_alive: true,
        }
    }
}

impl Default for StaticFilesConfig {
    fn default() -> Self {
        Self {
            index_path: PathBuf::from("./public/index.html"),
        }
    }
}

impl ServerConfig {
    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout_secs)
    }
}

impl Config {
    /// Defaults plus environment overrides.
    pub fn load() -> Self {
        let mut cfg = Config::default();
        cfg.apply_env();
        cfg
    }

    /// Reads a YAML file, then applies environment overrides.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let mut cfg = Self::from_yaml(&content)?;
        cfg.apply_env();
        Ok(cfg)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        // serde_yaml maps an empty document to unit, not an empty mapping.
        if content.trim().is_empty() {
            return Ok(Config::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn extra_headers(&self) -> Headers {
        self.extra_headers.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect()
    }

    fn apply_env(&mut self) {
        if let Ok(addr) = std::env::var(LISTEN_ENV) {
            self.server.listen_addr = addr;
        }
    }
}
