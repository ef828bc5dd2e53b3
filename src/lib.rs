//! # sqlcrawl
//!
//! Crawls a relational database catalog into an in-memory schema model.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │        ConnectionConfig (url, credentials, patterns)     │
//! │        from env, sqlcrawl.toml, or the CLI               │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [MetadataConnector]
//! ┌─────────────────────────────────────────────────────────┐
//! │        MetadataSource (tables, columns, keys,            │
//! │        procedures as CatalogRow values)                  │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [SchemaCrawler]
//! ┌─────────────────────────────────────────────────────────┐
//! │        Schema (sequences, tables, columns, functions)    │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [SpecificationWriter]
//! ┌─────────────────────────────────────────────────────────┐
//! │        schema.json / generated Rust structs              │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```ignore
//! use sqlcrawl::config::ConnectionConfig;
//! use sqlcrawl::metadata::SqliteConnector;
//!
//! let config = ConnectionConfig::sqlite("app.db");
//! let schema = sqlcrawl::crawl(&SqliteConnector, &config)?;
//! for table in &schema.tables {
//!     println!("{} ({} columns)", table.table_name, table.columns.len());
//! }
//! ```

pub mod config;
pub mod crawler;
pub mod metadata;
pub mod model;
pub mod writer;

pub use config::ConnectionConfig;
pub use crawler::{crawl, CrawlError, CrawlResult, SchemaCrawler};
pub use model::Schema;
