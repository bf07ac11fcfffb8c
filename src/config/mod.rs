use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::infrastructure::ApiConfig;

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8080/api/v1";
pub const DEFAULT_EXPLORER_URL: &str = "https://etherscan.io";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

const CONFIG_ENV: &str = "SMART_WALLET_CONFIG";
const BACKEND_URL_ENV: &str = "SMART_WALLET_BACKEND_URL";
const ML_SERVICE_URL_ENV: &str = "SMART_WALLET_ML_SERVICE_URL";

#[derive(Debug, Clone, Deserialize)]
pub struct ExampleAddress {
    pub address: String,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    pub backend_url: Option<String>,

    pub ml_service_url: Option<String>,

    pub request_timeout_secs: Option<u64>,

    pub explorer_url: Option<String>,

    #[serde(default)]
    pub example_addresses: Vec<ExampleAddress>,
}

impl ExampleAddress {
    pub fn display_name(&self) -> String {
        self.name
            .clone()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| crate::domain::format::wallet_address(&self.address))
    }
}

impl Config {
    /// Fold in `SMART_WALLET_*` environment overrides
    pub fn with_env(mut self) -> Self {
        if let Some(url) = env_non_empty(BACKEND_URL_ENV) {
            self.backend_url = Some(url);
        }
        if let Some(url) = env_non_empty(ML_SERVICE_URL_ENV) {
            self.ml_service_url = Some(url);
        }
        self
    }

    pub fn api_config(&self) -> ApiConfig {
        ApiConfig {
            backend_url: self
                .backend_url
                .clone()
                .unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string()),
            ml_service_url: self
                .ml_service_url
                .clone()
                .filter(|url| !url.trim().is_empty()),
            timeout: Duration::from_secs(
                self.request_timeout_secs
                    .filter(|secs| *secs > 0)
                    .unwrap_or(DEFAULT_TIMEOUT_SECS),
            ),
        }
    }

    pub fn explorer_url(&self) -> String {
        self.explorer_url
            .clone()
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_EXPLORER_URL.to_string())
    }

    /// Addresses offered on the input screen when none are configured
    pub fn quick_picks(&self) -> Vec<ExampleAddress> {
        if !self.example_addresses.is_empty() {
            return self.example_addresses.clone();
        }
        vec![ExampleAddress {
            address: "0xcB1C1FdE09f811B294172696404e88E658659905".to_string(),
            name: Some("Example wallet".to_string()),
        }]
    }
}

pub fn load() -> Config {
    let Some(path) = config_path() else {
        return Config::default().with_env();
    };
    load_from(&path).with_env()
}

/// Read a config file; a missing or malformed file yields the defaults
pub fn load_from(path: &Path) -> Config {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(_) => return Config::default(),
    };
    match toml::from_str::<Config>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "ignoring malformed config");
            Config::default()
        }
    }
}

pub fn config_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os(CONFIG_ENV).map(PathBuf::from) {
        return Some(path);
    }
    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from) {
        return Some(xdg.join("smart-wallet").join("config.toml"));
    }
    if let Some(home) = std::env::var_os("HOME").map(PathBuf::from) {
        return Some(home.join(".config").join("smart-wallet").join("config.toml"));
    }

    directories::ProjectDirs::from("io", "smart-wallet", "smart-wallet")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

pub fn data_dir() -> Option<PathBuf> {
    if let Some(xdg) = std::env::var_os("XDG_DATA_HOME").map(PathBuf::from) {
        return Some(xdg.join("smart-wallet"));
    }
    if let Some(home) = std::env::var_os("HOME").map(PathBuf::from) {
        return Some(home.join(".local").join("share").join("smart-wallet"));
    }
    directories::ProjectDirs::from("io", "smart-wallet", "smart-wallet")
        .map(|dirs| dirs.data_dir().to_path_buf())
}

pub fn log_dir() -> Option<PathBuf> {
    data_dir().map(|dir| dir.join("logs"))
}

pub fn export_dir() -> Option<PathBuf> {
    data_dir().map(|dir| dir.join("exports"))
}

fn env_non_empty(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}
