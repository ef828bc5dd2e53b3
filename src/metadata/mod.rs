//! Metadata source module.
//!
//! This module abstracts catalog introspection behind a connection-scoped
//! [`MetadataSource`] and the [`MetadataConnector`] that opens it.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      MetadataConnector                          │
//! │        connect(&ConnectionConfig) -> Box<dyn MetadataSource>    │
//! └─────────────────────────────────────────────────────────────────┘
//!                           │
//!                           ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      MetadataSource                             │
//! │  - driver_info()          - primary_keys(table)                 │
//! │  - tables(types)          - exported_keys(table)                │
//! │  - columns(table)         - procedures()                        │
//! └─────────────────────────────────────────────────────────────────┘
//!                           │
//!              ┌────────────┴─────────────┐
//!              ▼                          ▼
//!   SqliteMetadataSource          InMemoryCatalog
//!   (pragmas via rusqlite)        (fixtures, fault injection)
//! ```
//!
//! Every query answers with [`CatalogRow`]s labelled as in [`labels`].

mod error;
pub mod labels;
mod memory;
mod row;
mod source;
mod sqlite;

pub use error::{SourceError, SourceResult};
pub use memory::{InMemoryCatalog, QueryKind};
pub use row::{CatalogRow, Value};
pub use source::{DriverInfo, MetadataConnector, MetadataSource};
pub use sqlite::{SqliteConnector, SqliteMetadataSource};
