//! Schema crawler.
//!
//! Turns catalog metadata into a [`Schema`](crate::model::Schema):
//!
//! ```text
//! SchemaCrawler::connect ── driver_info()            (fail fast)
//!        │
//!        ▼ crawl()
//!   sequences ── tables(SEQUENCE)                   verbatim
//!   tables    ── tables(TABLE) ─► TableFilter       pattern full-match, OR
//!                    │
//!                    └─► ColumnResolver             per table:
//!                          columns(t)                 materialise
//!                          primary_keys(t)            attach KEY_SEQ
//!                          exported_keys(t)           attach Key{fk table, fk column}
//!                    └─► bind sequence              first name containing the table name
//!   functions ── procedures()                       verbatim
//! ```
//!
//! Any failure aborts the whole crawl; there is no partial schema.

mod columns;
mod error;
mod filter;
mod schema_crawler;

pub use columns::ColumnResolver;
pub use error::{CrawlError, CrawlResult, IntegrityFault, KeyKind, Stage};
pub use filter::TableFilter;
pub use schema_crawler::{crawl, SchemaCrawler};
