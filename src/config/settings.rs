//! TOML-based configuration for sqlcrawl.
//!
//! Supports a config file (sqlcrawl.toml) with environment variable expansion.
//!
//! Example configuration:
//! ```toml
//! [connections.production]
//! url = "sqlite:${DATA_DIR}/prod.db"
//! table_patterns = ["USER_.*", "ORDER_.*"]
//!
//! [connections.dev]
//! url = "sqlite:./dev.db"
//!
//! [output]
//! target = "rust"
//! directory = "./generated"
//! package = "db.model"
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use super::connection::ConnectionConfig;

/// Error type for settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Connection not found: {0}")]
    ConnectionNotFound(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// Named database connections.
    pub connections: BTreeMap<String, ConnectionSettings>,

    /// Output configuration.
    pub output: OutputSettings,
}

/// Connection configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ConnectionSettings {
    /// Connection URL (supports ${ENV_VAR} expansion).
    pub url: String,

    /// Principal (supports ${ENV_VAR} expansion).
    #[serde(default)]
    pub username: Option<String>,

    /// Credential (supports ${ENV_VAR} expansion).
    #[serde(default)]
    pub password: Option<String>,

    /// Table-name inclusion patterns.
    #[serde(default)]
    pub table_patterns: Option<Vec<String>>,
}

impl ConnectionSettings {
    /// Build a connection config with environment variables expanded.
    pub fn to_config(&self) -> Result<ConnectionConfig, SettingsError> {
        let expand = |value: &Option<String>| value.as_deref().map(expand_env_vars).transpose();

        Ok(ConnectionConfig {
            url: expand_env_vars(&self.url)?,
            username: expand(&self.username)?,
            password: expand(&self.password)?,
            table_patterns: self.table_patterns.clone(),
        })
    }
}

/// Output configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Writer to use ("json", "rust").
    pub target: String,

    /// Directory generated files are written to.
    pub directory: Option<PathBuf>,

    /// Dotted package path for generated sources.
    pub package: Option<String>,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            target: "json".to_string(),
            directory: None,
            package: None,
        }
    }
}

impl Settings {
    /// Load settings from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SettingsError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let settings: Settings = toml::from_str(&content)?;
        Ok(settings)
    }

    /// Load settings from the default config file locations.
    ///
    /// Searches in order:
    /// 1. Environment variable `SQLCRAWL_CONFIG`
    /// 2. `./sqlcrawl.toml`
    /// 3. `~/.config/sqlcrawl/config.toml`
    pub fn load() -> Result<Self, SettingsError> {
        if let Ok(path) = env::var("SQLCRAWL_CONFIG") {
            return Self::from_file(&path);
        }

        let local_config = PathBuf::from("sqlcrawl.toml");
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("sqlcrawl").join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        Ok(Settings::default())
    }

    /// Get a connection by name.
    pub fn get_connection(&self, name: &str) -> Result<&ConnectionSettings, SettingsError> {
        self.connections
            .get(name)
            .ok_or_else(|| SettingsError::ConnectionNotFound(name.to_string()))
    }

    /// Get the default connection ("default" if it exists, otherwise the first by name).
    pub fn default_connection(&self) -> Option<(&str, &ConnectionSettings)> {
        if let Some(conn) = self.connections.get("default") {
            return Some(("default", conn));
        }
        self.connections.iter().next().map(|(k, v)| (k.as_str(), v))
    }
}

/// Expand environment variables in a string.
///
/// Supports `${VAR}` and `$VAR` syntax. A lone `$` is kept.
pub fn expand_env_vars(s: &str) -> Result<String, SettingsError> {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '$' {
            result.push(c);
            continue;
        }

        let var_name: String = if chars.peek() == Some(&'{') {
            chars.next();
            chars.by_ref().take_while(|&ch| ch != '}').collect()
        } else {
            let mut name = String::new();
            while let Some(ch) = chars.next_if(|ch| ch.is_alphanumeric() || *ch == '_') {
                name.push(ch);
            }
            if name.is_empty() {
                result.push('$');
                continue;
            }
            name
        };

        let value =
            env::var(&var_name).map_err(|_| SettingsError::MissingEnvVar(var_name.clone()))?;
        result.push_str(&value);
    }

    Ok(result)
}
