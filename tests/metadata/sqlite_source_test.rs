//! Crawls of real SQLite database files.

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use rusqlite::Connection;
    use sqlcrawl::config::ConnectionConfig;
    use sqlcrawl::crawler::SchemaCrawler;
    use sqlcrawl::metadata::SqliteConnector;
    use sqlcrawl::model::{sql_types, Flag, Key};
    use sqlcrawl::{crawl, CrawlError};
    use tempfile::TempDir;

    const SHOP: &str = "
        CREATE TABLE customer (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name VARCHAR(80) NOT NULL,
            balance DECIMAL(18, 2) DEFAULT 0,
            email TEXT
        );
        CREATE TABLE product (
            sku TEXT PRIMARY KEY,
            price REAL,
            label TEXT GENERATED ALWAYS AS (upper(sku)) VIRTUAL
        );
        CREATE TABLE order_line (
            order_id INTEGER NOT NULL,
            line_no INTEGER NOT NULL,
            customer_id INTEGER REFERENCES customer(id),
            sku TEXT REFERENCES product,
            qty INTEGER,
            PRIMARY KEY (order_id, line_no)
        );
        CREATE VIEW big_spenders AS SELECT id FROM customer WHERE balance > 1000;
    ";

    fn database(ddl: &str) -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("shop.db");
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(ddl).unwrap();
        (dir, path)
    }

    #[test]
    fn test_crawl_sqlite_file() {
        let (_dir, path) = database(SHOP);
        let schema = crawl(&SqliteConnector, &ConnectionConfig::sqlite(&path)).unwrap();

        assert_eq!(schema.driver_name.as_deref(), Some("SQLite"));
        assert!(schema.driver_version.is_some());
        assert!(schema.sequences.is_empty());
        assert!(schema.functions.is_empty());

        let names: Vec<_> = schema.table_names().collect();
        assert_eq!(names, vec!["customer", "order_line", "product"]);
    }

    #[test]
    fn test_column_attributes() {
        let (_dir, path) = database(SHOP);
        let schema = crawl(&SqliteConnector, &ConnectionConfig::sqlite(&path)).unwrap();
        let customer = schema.table("customer").unwrap();

        let columns: Vec<_> = customer.columns.iter().map(|c| c.column_name.as_str()).collect();
        assert_eq!(columns, vec!["id", "name", "balance", "email"]);

        let id = customer.column("id").unwrap();
        assert_eq!(id.primary_key_index, Some(1));
        assert_eq!(id.auto_increment, Flag::Yes);
        assert_eq!(id.data_type, Some(sql_types::INTEGER));
        assert_eq!(id.ordinal_position, Some(1));

        let name = customer.column("name").unwrap();
        assert_eq!(name.type_name.as_deref(), Some("VARCHAR"));
        assert_eq!(name.size, Some(80));
        assert_eq!(name.nullable, Flag::No);
        assert_eq!(name.auto_increment, Flag::No);

        let balance = customer.column("balance").unwrap();
        assert_eq!(balance.data_type, Some(sql_types::DECIMAL));
        assert_eq!(balance.size, Some(18));
        assert_eq!(balance.decimal_digits, Some(2));
        assert_eq!(balance.column_default.as_deref(), Some("0"));
        assert!(balance.is_nullable());
    }

    #[test]
    fn test_composite_primary_key_and_foreign_keys() {
        let (_dir, path) = database(SHOP);
        let schema = crawl(&SqliteConnector, &ConnectionConfig::sqlite(&path)).unwrap();

        let line = schema.table("order_line").unwrap();
        assert_eq!(line.column("order_id").unwrap().primary_key_index, Some(1));
        assert_eq!(line.column("line_no").unwrap().primary_key_index, Some(2));
        assert!(line.column("qty").unwrap().primary_key_index.is_none());
        assert!(!line.column("qty").unwrap().is_auto_increment());

        let customer = schema.table("customer").unwrap();
        assert!(customer
            .column("id")
            .unwrap()
            .exported_keys
            .contains(&Key::new("order_line", "customer_id")));

        // REFERENCES without a column list points at the primary key
        let product = schema.table("product").unwrap();
        assert!(product
            .column("sku")
            .unwrap()
            .exported_keys
            .contains(&Key::new("order_line", "sku")));
        assert!(product.column("price").unwrap().exported_keys.is_empty());
    }

    #[test]
    fn test_foreign_key_column_case_is_normalised() {
        let (_dir, path) = database(
            "PRAGMA foreign_keys = ON;
             CREATE TABLE parent (id INTEGER PRIMARY KEY, label TEXT);
             CREATE TABLE child (
                 id INTEGER PRIMARY KEY,
                 parent_id INTEGER REFERENCES parent(ID),
                 parent_label TEXT REFERENCES Parent(Label)
             );
             INSERT INTO parent (id, label) VALUES (1, 'one');
             INSERT INTO child (id, parent_id) VALUES (10, 1);",
        );

        let schema = crawl(&SqliteConnector, &ConnectionConfig::sqlite(&path)).unwrap();
        let parent = schema.table("parent").unwrap();
        assert!(parent
            .column("id")
            .unwrap()
            .exported_keys
            .contains(&Key::new("child", "parent_id")));
        assert!(parent
            .column("label")
            .unwrap()
            .exported_keys
            .contains(&Key::new("child", "parent_label")));
    }

    #[test]
    fn test_foreign_key_to_missing_column_is_integrity_fault() {
        let (_dir, path) = database(
            "CREATE TABLE parent (id INTEGER PRIMARY KEY);
             CREATE TABLE child (id INTEGER PRIMARY KEY, parent_uid INTEGER REFERENCES parent(uid));",
        );

        let err = crawl(&SqliteConnector, &ConnectionConfig::sqlite(&path)).unwrap_err();
        assert!(err.is_integrity(), "{err}");
    }

    #[test]
    fn test_generated_column() {
        let (_dir, path) = database(SHOP);
        let schema = crawl(&SqliteConnector, &ConnectionConfig::sqlite(&path)).unwrap();

        let product = schema.table("product").unwrap();
        assert_eq!(product.column("label").unwrap().generated, Flag::Yes);
        assert_eq!(product.column("price").unwrap().generated, Flag::No);
        assert_eq!(product.column("label").unwrap().ordinal_position, Some(3));
    }

    #[test]
    fn test_autoincrement_needs_the_keyword() {
        let (_dir, path) = database("CREATE TABLE plain (id INTEGER PRIMARY KEY, v TEXT);");
        let schema = crawl(&SqliteConnector, &ConnectionConfig::sqlite(&path)).unwrap();

        let id = schema.table("plain").unwrap().column("id").unwrap();
        assert_eq!(id.auto_increment, Flag::No);
        assert_eq!(id.primary_key_index, Some(1));
    }

    #[test]
    fn test_patterns_filter_sqlite_tables() {
        let (_dir, path) = database(SHOP);
        let config = ConnectionConfig::sqlite(&path).with_table_patterns(["order_.*", "product"]);

        let schema = crawl(&SqliteConnector, &config).unwrap();
        let names: Vec<_> = schema.table_names().collect();
        assert_eq!(names, vec!["order_line", "product"]);
    }

    #[test]
    fn test_repeated_crawls_match() {
        let (_dir, path) = database(SHOP);
        let config = ConnectionConfig::sqlite(&path);
        let crawler = SchemaCrawler::connect(&SqliteConnector, &config).unwrap();

        let first = crawler.crawl().unwrap();
        let second = crawler.crawl().unwrap();
        assert_eq!(first.fingerprint().unwrap(), second.fingerprint().unwrap());
    }

    #[test]
    fn test_missing_file_is_connectivity_error() {
        let dir = TempDir::new().unwrap();
        let config = ConnectionConfig::sqlite(dir.path().join("absent.db"));

        let err = crawl(&SqliteConnector, &config).unwrap_err();
        assert!(err.is_connectivity(), "{err}");
        assert!(matches!(err, CrawlError::Connectivity(_)));
    }

    #[test]
    fn test_unsupported_scheme_is_connectivity_error() {
        let config = ConnectionConfig::new("postgres://db.example.com/app");
        let err = crawl(&SqliteConnector, &config).unwrap_err();
        assert!(err.is_connectivity());
    }
}
