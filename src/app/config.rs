//! Usage: Runtime configuration (TOML file + environment overrides).

use crate::oauth::provider::{GITHUB_AUTHORIZE_URL, GITHUB_TOKEN_URL};
use crate::shared::error::AppResult;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8319";
const DEFAULT_SETTINGS_PATH: &str = "settings.json";
const CONFIG_PATH_ENV: &str = "GH_CONNECTOR_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "connector.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub listen_addr: String,
    /// Externally reachable base URL; the OAuth redirect and callback URLs
    /// derive from it, so it must match what GitHub can reach.
    pub public_base_url: String,
    pub settings_path: PathBuf,
    pub authorize_url: String,
    pub token_url: String,
    /// Restores the legacy unverified-TLS token exchange. Leave off.
    pub insecure_skip_tls_verify: bool,
    pub log_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            listen_addr: DEFAULT_LISTEN_ADDR.to_string(),
            public_base_url: format!("http://{DEFAULT_LISTEN_ADDR}"),
            settings_path: PathBuf::from(DEFAULT_SETTINGS_PATH),
            authorize_url: GITHUB_AUTHORIZE_URL.to_string(),
            token_url: GITHUB_TOKEN_URL.to_string(),
            insecure_skip_tls_verify: false,
            log_dir: None,
        }
    }
}

impl AppConfig {
    /// Parse a TOML config document; absent keys keep their defaults.
    pub fn from_toml_str(content: &str) -> AppResult<Self> {
        let config: AppConfig = toml::from_str(content)
            .map_err(|e| format!("SEC_INVALID_INPUT: invalid config file: {e}"))?;
        config.validated()
    }

    /// Load from `GH_CONNECTOR_CONFIG` (or `connector.toml` when present),
    /// then apply `GH_CONNECTOR_*` environment overrides.
    pub fn load() -> AppResult<Self> {
        let explicit_path = std::env::var(CONFIG_PATH_ENV).ok();
        let path = explicit_path
            .clone()
            .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());

        let mut config = match std::fs::read_to_string(&path) {
            Ok(content) => Self::from_toml_str(&content)?,
            Err(err)
                if err.kind() == std::io::ErrorKind::NotFound && explicit_path.is_none() =>
            {
                AppConfig::default()
            }
            Err(err) => {
                return Err(format!("SYSTEM_ERROR: failed to read config {path}: {err}").into())
            }
        };

        if let Ok(value) = std::env::var("GH_CONNECTOR_LISTEN_ADDR") {
            config.listen_addr = value;
        }
        if let Ok(value) = std::env::var("GH_CONNECTOR_PUBLIC_BASE_URL") {
            config.public_base_url = value;
        }
        if let Ok(value) = std::env::var("GH_CONNECTOR_SETTINGS_PATH") {
            config.settings_path = PathBuf::from(value);
        }
        if let Ok(value) = std::env::var("GH_CONNECTOR_INSECURE_TLS") {
            config.insecure_skip_tls_verify = matches!(value.trim(), "1" | "true" | "yes");
        }
        if let Ok(value) = std::env::var("GH_CONNECTOR_LOG_DIR") {
            config.log_dir = Some(PathBuf::from(value));
        }

        config.validated()
    }

    fn validated(mut self) -> AppResult<Self> {
        if self.listen_addr.trim().is_empty() {
            return Err("SEC_INVALID_INPUT: listen_addr must not be empty".into());
        }

        self.public_base_url = self.public_base_url.trim_end_matches('/').to_string();
        reqwest::Url::parse(&self.public_base_url)
            .map_err(|e| format!("SEC_INVALID_INPUT: invalid public_base_url: {e}"))?;
        reqwest::Url::parse(&self.authorize_url)
            .map_err(|e| format!("SEC_INVALID_INPUT: invalid authorize_url: {e}"))?;
        reqwest::Url::parse(&self.token_url)
            .map_err(|e| format!("SEC_INVALID_INPUT: invalid token_url: {e}"))?;

        Ok(self)
    }
}
