//! Schema crawl orchestration.

use tracing::{debug, info, warn};

use super::columns::ColumnResolver;
use super::error::{at, CrawlError, CrawlResult, Stage};
use super::filter::TableFilter;
use crate::config::ConnectionConfig;
use crate::metadata::{labels, CatalogRow, DriverInfo, MetadataConnector, MetadataSource};
use crate::model::{Column, Function, Schema, Table};

/// Crawls a catalog into a [`Schema`].
///
/// Construction connects once and reads the driver identity, so an
/// unreachable catalog fails before any crawl is attempted. Each catalog-wide
/// query and each table's column resolution then runs on its own connection,
/// released as soon as that step is done.
///
/// # Example
///
/// ```ignore
/// use sqlcrawl::config::ConnectionConfig;
/// use sqlcrawl::crawler::SchemaCrawler;
/// use sqlcrawl::metadata::SqliteConnector;
///
/// let config = ConnectionConfig::sqlite("app.db").with_table_patterns(["USER_.*"]);
/// let crawler = SchemaCrawler::connect(&SqliteConnector, &config)?;
/// let schema = crawler.crawl()?;
/// ```
pub struct SchemaCrawler<'c> {
    connector: &'c dyn MetadataConnector,
    config: ConnectionConfig,
    filter: TableFilter,
    driver: DriverInfo,
}

impl<'c> SchemaCrawler<'c> {
    /// Connect and read the driver identity.
    pub fn connect(
        connector: &'c dyn MetadataConnector,
        config: &ConnectionConfig,
    ) -> CrawlResult<Self> {
        let filter = TableFilter::from_config(config)?;

        let source = connector.connect(config).map_err(CrawlError::Connectivity)?;
        let driver = source.driver_info().map_err(at(Stage::DriverInfo))?;
        drop(source);

        info!(
            driver = %driver.name,
            version = driver.version.as_deref().unwrap_or("unknown"),
            url = %config.display_url(),
            "connected to catalog"
        );

        Ok(Self {
            connector,
            config: config.clone(),
            filter,
            driver,
        })
    }

    pub fn driver(&self) -> &DriverInfo {
        &self.driver
    }

    pub fn filter(&self) -> &TableFilter {
        &self.filter
    }

    /// Crawl sequences, tables and procedures into a schema.
    pub fn crawl(&self) -> CrawlResult<Schema> {
        let sequences = self.sequences()?;
        let tables = self.tables(&sequences)?;
        let functions = self.functions()?;

        let schema = Schema {
            driver_name: Some(self.driver.name.clone()),
            driver_version: self.driver.version.clone(),
            sequences,
            tables,
            functions,
        };
        info!(
            sequences = schema.sequences.len(),
            tables = schema.tables.len(),
            columns = schema.column_count(),
            functions = schema.functions.len(),
            "crawl complete"
        );
        Ok(schema)
    }

    fn open(&self) -> CrawlResult<Box<dyn MetadataSource + 'c>> {
        self.connector
            .connect(&self.config)
            .map_err(CrawlError::Connectivity)
    }

    /// Sequence names, verbatim and unfiltered.
    fn sequences(&self) -> CrawlResult<Vec<String>> {
        let rows = self
            .open()?
            .tables(&[labels::TYPE_SEQUENCE])
            .map_err(at(Stage::Sequences))?;

        rows.iter()
            .map(|row| required_name(row, labels::TABLE_NAME))
            .collect::<Result<Vec<_>, _>>()
            .map_err(at(Stage::Sequences))
    }

    fn tables(&self, sequences: &[String]) -> CrawlResult<Vec<Table>> {
        let rows = self
            .open()?
            .tables(&[labels::TYPE_TABLE])
            .map_err(at(Stage::Tables))?;

        let mut tables = Vec::new();
        for row in &rows {
            let name = required_name(row, labels::TABLE_NAME).map_err(at(Stage::Tables))?;
            if !self.filter.include(&name) {
                debug!(table = %name, "table excluded by filter");
                continue;
            }

            let mut table = table_from_row(name, row);
            table.columns = self.columns(&table.table_name)?;
            table.sequence_name = sequences
                .iter()
                .find(|s| s.contains(table.table_name.as_str()))
                .cloned();

            debug!(
                table = %table.table_name,
                columns = table.columns.len(),
                sequence = table.sequence_name.as_deref().unwrap_or("-"),
                "table crawled"
            );
            tables.push(table);
        }
        Ok(tables)
    }

    fn columns(&self, table: &str) -> CrawlResult<Vec<Column>> {
        let source = self.open()?;
        ColumnResolver::new(&*source).resolve(table)
    }

    fn functions(&self) -> CrawlResult<Vec<Function>> {
        let rows = self.open()?.procedures().map_err(at(Stage::Procedures))?;
        rows.iter()
            .map(|row| function_from_row(row).map_err(at(Stage::Procedures)))
            .collect()
    }
}

/// Crawl the catalog behind `config` in one call.
pub fn crawl(
    connector: &dyn MetadataConnector,
    config: &ConnectionConfig,
) -> CrawlResult<Schema> {
    SchemaCrawler::connect(connector, config)?.crawl()
}

fn required_name(row: &CatalogRow, label: &str) -> crate::metadata::SourceResult<String> {
    row.get_str(label)
        .filter(|name| !name.is_empty())
        .ok_or_else(|| crate::metadata::SourceError::MissingField(label.to_string()))
}

fn table_from_row(name: String, row: &CatalogRow) -> Table {
    let mut table = Table::new(name);
    table.category = row.get_str(labels::TABLE_CAT);
    table.schema = row.get_str(labels::TABLE_SCHEM);
    table.table_type = row.get_str(labels::TABLE_TYPE);
    table.remarks = row.get_str(labels::REMARKS);
    table.type_category = row.get_str(labels::TYPE_CAT);
    table.type_schema = row.get_str(labels::TYPE_SCHEM);
    table.type_name = row.get_str(labels::TYPE_NAME);
    table.self_referencing_column = row.get_str(labels::SELF_REFERENCING_COL_NAME);
    table.reference_generation = row.get_str(labels::REF_GENERATION);
    table
}

fn function_from_row(row: &CatalogRow) -> crate::metadata::SourceResult<Function> {
    let mut function = Function::new(required_name(row, labels::PROCEDURE_NAME)?);
    function.category = row.get_str(labels::PROCEDURE_CAT);
    function.schema = row.get_str(labels::PROCEDURE_SCHEM);
    function.function_type = match row.get_i16(labels::PROCEDURE_TYPE) {
        Ok(kind) => kind,
        Err(e) => {
            warn!(procedure = %function.name, error = %e, "ignoring malformed procedure type");
            None
        }
    };
    function.remarks = row.get_str(labels::REMARKS);
    function.specific_name = row.get_str(labels::SPECIFIC_NAME);
    Ok(function)
}
