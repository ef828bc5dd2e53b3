#[cfg(test)]
mod tests {
    use sqlcrawl::config::ConnectionConfig;
    use sqlcrawl::crawl;
    use sqlcrawl::crawler::TableFilter;
    use sqlcrawl::metadata::InMemoryCatalog;

    fn catalog() -> InMemoryCatalog {
        InMemoryCatalog::new()
            .with_table("USER_ACCOUNTS")
            .with_table("PRODUCT_CATALOG")
            .with_table("ORDER_LINES")
            .with_table("AUDIT_USER_LOG")
            .with_column("USER_ACCOUNTS", "id", "INTEGER")
            .with_column("PRODUCT_CATALOG", "sku", "TEXT")
            .with_column("ORDER_LINES", "id", "INTEGER")
    }

    #[test]
    fn test_user_and_order_patterns() {
        let filter = TableFilter::new(["USER_.*", "ORDER_.*"]).unwrap();

        assert!(filter.include("USER_ACCOUNTS"));
        assert!(filter.include("ORDER_LINES"));
        assert!(!filter.include("PRODUCT_CATALOG"));
        assert!(!filter.include("AUDIT_USER_LOG"));
    }

    #[test]
    fn test_empty_and_absent_patterns_include_everything() {
        let absent = TableFilter::from_config(&ConnectionConfig::new("memory")).unwrap();
        let empty = TableFilter::new(Vec::<String>::new()).unwrap();

        for filter in [absent, empty] {
            assert!(filter.is_open());
            assert!(filter.include("PRODUCT_CATALOG"));
        }
    }

    #[test]
    fn test_patterns_are_case_sensitive() {
        let filter = TableFilter::new(["user_.*"]).unwrap();
        assert!(!filter.include("USER_ACCOUNTS"));

        let filter = TableFilter::new(["(?i)user_.*"]).unwrap();
        assert!(filter.include("USER_ACCOUNTS"));
    }

    #[test]
    fn test_crawl_applies_patterns() {
        let config = ConnectionConfig::new("memory").with_table_patterns(["USER_.*", "ORDER_.*"]);
        let schema = crawl(&catalog(), &config).unwrap();

        let names: Vec<_> = schema.table_names().collect();
        assert_eq!(names, vec!["USER_ACCOUNTS", "ORDER_LINES"]);
    }

    #[test]
    fn test_crawl_without_patterns_includes_everything() {
        let schema = crawl(&catalog(), &ConnectionConfig::new("memory")).unwrap();
        assert_eq!(schema.tables.len(), 4);

        let config = ConnectionConfig::new("memory").with_table_patterns(Vec::<String>::new());
        let schema = crawl(&catalog(), &config).unwrap();
        assert_eq!(schema.tables.len(), 4);
        assert!(schema.table("PRODUCT_CATALOG").is_some());
    }

    #[test]
    fn test_excluded_tables_are_not_resolved() {
        let catalog = catalog();
        let config = ConnectionConfig::new("memory").with_table_patterns(["USER_.*"]);
        crawl(&catalog, &config).unwrap();

        // bootstrap, sequences, tables, USER_ACCOUNTS, procedures
        assert_eq!(catalog.connections_opened(), 5);
    }

    #[test]
    fn test_filter_does_not_touch_procedures_or_sequences() {
        let catalog = catalog()
            .with_sequence("PRODUCT_SEQ")
            .with_procedure("refresh_catalog", "refresh_catalog");
        let config = ConnectionConfig::new("memory").with_table_patterns(["USER_.*"]);

        let schema = crawl(&catalog, &config).unwrap();
        assert_eq!(schema.sequences, vec!["PRODUCT_SEQ"]);
        assert_eq!(schema.functions.len(), 1);
    }
}
