//! Database connection configuration.
//!
//! Supports configuration via environment variables:
//! - `SQLCRAWL_DB_URL`: Connection URL (required)
//! - `SQLCRAWL_DB_USER`: Principal (optional)
//! - `SQLCRAWL_DB_PASSWORD`: Credential (optional)
//! - `SQLCRAWL_TABLE_PATTERNS`: Comma-separated table-name patterns (optional)

use std::env;
use std::fmt;
use std::path::PathBuf;

/// Error type for connection configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Unsupported driver: {0}. Supported: sqlite")]
    UnsupportedDriver(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Supported database drivers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Driver {
    /// SQLite (file or in-memory)
    Sqlite,
}

impl Driver {
    /// Determine the driver from a connection URL.
    ///
    /// A URL without a scheme is taken as a SQLite file path.
    pub fn from_url(url: &str) -> ConfigResult<Self> {
        let url = url.trim();
        if url.is_empty() {
            return Err(ConfigError::InvalidConfig("empty connection url".to_string()));
        }
        match url_scheme(url) {
            None => Ok(Driver::Sqlite),
            Some(scheme) => match scheme.to_lowercase().as_str() {
                "sqlite" | "sqlite3" | "file" => Ok(Driver::Sqlite),
                other => Err(ConfigError::UnsupportedDriver(other.to_string())),
            },
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Driver::Sqlite => "sqlite",
        }
    }
}

/// Where a SQLite database lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqliteLocation {
    Memory,
    File(PathBuf),
}

/// Extract the scheme of `url`, if it has one.
///
/// `:memory:` and single-letter drive prefixes are not schemes.
fn url_scheme(url: &str) -> Option<&str> {
    if url == ":memory:" {
        return None;
    }
    let (scheme, _) = url.split_once(':')?;
    let valid = scheme.len() > 1
        && scheme
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '+' || c == '-' || c == '.');
    valid.then_some(scheme)
}

/// Connection descriptor handed to the crawler.
#[derive(Clone)]
pub struct ConnectionConfig {
    /// Connection URL.
    pub url: String,
    /// Principal (optional).
    pub username: Option<String>,
    /// Credential (optional).
    pub password: Option<String>,
    /// Table-name inclusion patterns. `None` or empty includes every table.
    pub table_patterns: Option<Vec<String>>,
}

impl ConnectionConfig {
    /// Create a config for `url` with no credentials and no table patterns.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            username: None,
            password: None,
            table_patterns: None,
        }
    }

    /// Create a config for a SQLite database file.
    pub fn sqlite(path: impl Into<PathBuf>) -> Self {
        let path: PathBuf = path.into();
        Self::new(format!("sqlite:{}", path.display()))
    }

    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    pub fn with_table_patterns<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.table_patterns = Some(patterns.into_iter().map(Into::into).collect());
        self
    }

    /// Load configuration from environment variables.
    ///
    /// Required:
    /// - `SQLCRAWL_DB_URL`
    ///
    /// Optional:
    /// - `SQLCRAWL_DB_USER`
    /// - `SQLCRAWL_DB_PASSWORD`
    /// - `SQLCRAWL_TABLE_PATTERNS`
    pub fn from_env() -> ConfigResult<Self> {
        let url = env::var("SQLCRAWL_DB_URL")
            .map_err(|_| ConfigError::MissingEnvVar("SQLCRAWL_DB_URL".to_string()))?;

        let table_patterns = env::var("SQLCRAWL_TABLE_PATTERNS")
            .ok()
            .map(|raw| split_patterns(&raw))
            .filter(|patterns| !patterns.is_empty());

        Ok(Self {
            url,
            username: env::var("SQLCRAWL_DB_USER").ok(),
            password: env::var("SQLCRAWL_DB_PASSWORD").ok(),
            table_patterns,
        })
    }

    pub fn driver(&self) -> ConfigResult<Driver> {
        Driver::from_url(&self.url)
    }

    /// Resolve the SQLite database this config points at.
    pub fn sqlite_location(&self) -> ConfigResult<SqliteLocation> {
        let Driver::Sqlite = self.driver()?;

        let url = self.url.trim();
        let rest = match url_scheme(url) {
            Some(scheme) => &url[scheme.len() + 1..],
            None => url,
        };
        let rest = rest.strip_prefix("//").unwrap_or(rest);

        if rest.is_empty() || rest == ":memory:" || rest == "memory" {
            Ok(SqliteLocation::Memory)
        } else {
            Ok(SqliteLocation::File(PathBuf::from(rest)))
        }
    }

    /// The URL with any embedded credential masked, for logging.
    pub fn display_url(&self) -> String {
        match (self.url.find("://"), self.url.rfind('@')) {
            (Some(start), Some(at)) if at > start => {
                format!("{}://***@{}", &self.url[..start], &self.url[at + 1..])
            }
            _ => self.url.clone(),
        }
    }
}

impl fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("url", &self.display_url())
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("table_patterns", &self.table_patterns)
            .finish()
    }
}

/// Split a comma-separated pattern list, dropping blanks.
pub fn split_patterns(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}
