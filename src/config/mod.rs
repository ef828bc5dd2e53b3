//! Configuration module for sqlcrawl.
//!
//! Handles connection configuration, environment variables, and settings.

mod connection;
mod settings;

pub use connection::{
    split_patterns, ConfigError, ConfigResult, ConnectionConfig, Driver, SqliteLocation,
};
pub use settings::{expand_env_vars, ConnectionSettings, OutputSettings, Settings, SettingsError};
