//! Configuration for the backend address.
//!
//! Resolution order: `--server` flag, then the `RAGDESK_SERVER` environment
//! variable, then `server_url` in the TOML config file, then the default
//! local backend.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

pub const DEFAULT_SERVER_URL: &str = "http://localhost:8000";
pub const SERVER_ENV_VAR: &str = "RAGDESK_SERVER";

#[derive(Debug, Serialize, Deserialize, Default, Clone)]
pub struct Config {
    /// Base URL of the assistant backend.
    pub server_url: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        match Self::config_path() {
            Some(path) => Self::load_from_path(&path),
            None => Ok(Config::default()),
        }
    }

    pub fn load_from_path(config_path: &PathBuf) -> Result<Self, Box<dyn std::error::Error>> {
        if config_path.exists() {
            let contents = fs::read_to_string(config_path)
                .map_err(|e| format!("Failed to read config at {}: {e}", config_path.display()))?;
            let config: Config = toml::from_str(&contents)
                .map_err(|e| format!("Failed to parse config at {}: {e}", config_path.display()))?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    fn config_path() -> Option<PathBuf> {
        let proj_dirs = ProjectDirs::from("org", "permacommons", "ragdesk")?;
        Some(proj_dirs.config_dir().join("config.toml"))
    }

    /// Pick the backend base URL, normalized for endpoint joining.
    pub fn resolve_server_url(&self, flag: Option<&str>) -> String {
        let url = flag
            .map(String::from)
            .or_else(|| std::env::var(SERVER_ENV_VAR).ok())
            .or_else(|| self.server_url.clone())
            .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string());
        url.trim_end_matches('/').to_string()
    }
}
