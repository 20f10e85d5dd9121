use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable that overrides `api_url`
pub const API_URL_ENV: &str = "KIOSKDB_API_URL";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// API host, empty for same-origin/relative requests
    #[serde(default)]
    pub api_url: String,
    #[serde(default = "default_login_path")]
    pub login_path: String,
    #[serde(default)]
    pub auth_scheme: AuthScheme,
    /// Where the session token is persisted; see `Config::token_path`
    #[serde(default)]
    pub token_path: Option<String>,
    #[serde(default)]
    pub databases: Databases,
}

/// How the session token is rendered into the `X-Authorization` header
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum AuthScheme {
    #[default]
    Raw,
    Bearer,
}

impl AuthScheme {
    pub fn header_value(&self, token: &str) -> String {
        match self {
            AuthScheme::Raw => token.to_string(),
            AuthScheme::Bearer => format!("Bearer {}", token),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Databases {
    #[serde(default = "default_uac")]
    pub uac: DatabaseConfig,
    #[serde(default = "default_kiosk")]
    pub kiosk: DatabaseConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub base_url: String,
}

impl DatabaseConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

fn default_login_path() -> String {
    "/UAC/api/login".to_string()
}

fn default_uac() -> DatabaseConfig {
    DatabaseConfig::new("/UAC/api")
}

fn default_kiosk() -> DatabaseConfig {
    DatabaseConfig::new("/KIOSK/api")
}

impl Default for Databases {
    fn default() -> Self {
        Self {
            uac: default_uac(),
            kiosk: default_kiosk(),
        }
    }
}

impl Config {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&contents)?;
        Ok(config)
    }

    /// Apply `KIOSKDB_API_URL` on top of whatever was loaded
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(api_url) = std::env::var(API_URL_ENV) {
            tracing::debug!("{} overrides api_url", API_URL_ENV);
            self.api_url = api_url;
        }
        self
    }

    /// Session file location, falling back to the user's config directory
    pub fn token_path(&self) -> PathBuf {
        match &self.token_path {
            Some(path) => PathBuf::from(path),
            None => dirs::config_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("kioskdb")
                .join("session.json"),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: String::new(),
            login_path: default_login_path(),
            auth_scheme: AuthScheme::default(),
            token_path: None,
            databases: Databases::default(),
        }
    }
}
