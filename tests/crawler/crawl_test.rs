//! End-to-end crawls against an in-memory catalog.

#[cfg(test)]
mod tests {
    use sqlcrawl::config::ConnectionConfig;
    use sqlcrawl::crawler::{CrawlError, KeyKind, SchemaCrawler, Stage};
    use sqlcrawl::metadata::{labels, CatalogRow, InMemoryCatalog, QueryKind};
    use sqlcrawl::model::{Flag, Key};
    use sqlcrawl::{crawl, Schema};

    fn config() -> ConnectionConfig {
        ConnectionConfig::new("memory")
    }

    /// CUSTOMER(id INT PK, name VARCHAR, ref_id INT) and
    /// ORDER(id INT PK, customer_ref INT FK -> CUSTOMER.id).
    fn shop() -> InMemoryCatalog {
        InMemoryCatalog::new()
            .with_table("CUSTOMER")
            .with_table("ORDER")
            .with_column("CUSTOMER", "id", "INT")
            .with_column("CUSTOMER", "name", "VARCHAR")
            .with_column("CUSTOMER", "ref_id", "INT")
            .with_primary_key("CUSTOMER", "id", 1)
            .with_column("ORDER", "id", "INT")
            .with_column("ORDER", "customer_ref", "INT")
            .with_primary_key("ORDER", "id", 1)
            .with_foreign_key("ORDER", "customer_ref", "CUSTOMER", "id")
    }

    #[test]
    fn test_customer_order_scenario() {
        let schema = crawl(&shop(), &config()).unwrap();

        assert_eq!(schema.tables.len(), 2);
        let customer = schema.table("CUSTOMER").unwrap();
        let order = schema.table("ORDER").unwrap();

        assert_eq!(customer.columns[0].primary_key_index, Some(1));
        assert_eq!(
            customer.columns[0].exported_keys.iter().collect::<Vec<_>>(),
            vec![&Key::new("ORDER", "customer_ref")]
        );
        assert_eq!(order.columns[0].primary_key_index, Some(1));

        assert!(customer.columns[1].primary_key_index.is_none());
        assert!(customer.columns[1].exported_keys.is_empty());
        assert!(order.columns[1].exported_keys.is_empty());
    }

    #[test]
    fn test_tables_keep_catalog_order() {
        let catalog = InMemoryCatalog::new()
            .with_table("ZEBRA")
            .with_table("APPLE")
            .with_table("MANGO");

        let schema = crawl(&catalog, &config()).unwrap();
        let names: Vec<_> = schema.table_names().collect();
        assert_eq!(names, vec!["ZEBRA", "APPLE", "MANGO"]);
    }

    #[test]
    fn test_table_attributes_are_copied() {
        let catalog = InMemoryCatalog::new().with_object_row(
            CatalogRow::new()
                .with(labels::TABLE_CAT, "main")
                .with(labels::TABLE_SCHEM, "app")
                .with(labels::TABLE_NAME, "ACCOUNT")
                .with(labels::TABLE_TYPE, labels::TYPE_TABLE)
                .with(labels::REMARKS, "customer accounts")
                .with(labels::REF_GENERATION, "SYSTEM"),
        );

        let schema = crawl(&catalog, &config()).unwrap();
        let table = &schema.tables[0];
        assert_eq!(table.category.as_deref(), Some("main"));
        assert_eq!(table.schema.as_deref(), Some("app"));
        assert_eq!(table.table_type.as_deref(), Some("TABLE"));
        assert_eq!(table.remarks.as_deref(), Some("customer accounts"));
        assert_eq!(table.reference_generation.as_deref(), Some("SYSTEM"));
        assert!(table.type_name.is_none());
        assert!(table.columns.is_empty());
    }

    #[test]
    fn test_sequence_binding_first_match_wins() {
        let catalog = shop()
            .with_sequence("SEQ_ORDER_ID")
            .with_sequence("ORDER_ALT_SEQ")
            .with_sequence("UNRELATED");

        let schema = crawl(&catalog, &config()).unwrap();
        assert_eq!(
            schema.table("ORDER").unwrap().sequence_name.as_deref(),
            Some("SEQ_ORDER_ID")
        );
        assert!(schema.table("CUSTOMER").unwrap().sequence_name.is_none());
    }

    #[test]
    fn test_sequence_match_is_case_sensitive_substring() {
        let catalog = InMemoryCatalog::new()
            .with_table("ITEM")
            .with_sequence("item_seq")
            .with_sequence("LINE_ITEM_SEQ");

        let schema = crawl(&catalog, &config()).unwrap();
        assert_eq!(
            schema.tables[0].sequence_name.as_deref(),
            Some("LINE_ITEM_SEQ")
        );
    }

    #[test]
    fn test_sequences_are_kept_verbatim() {
        let catalog = InMemoryCatalog::new()
            .with_sequence("S2")
            .with_sequence("S1")
            .with_sequence("S2");

        let schema = crawl(&catalog, &config()).unwrap();
        assert_eq!(schema.sequences, vec!["S2", "S1", "S2"]);
        assert!(schema.tables.is_empty());
    }

    #[test]
    fn test_views_and_sequences_are_not_tables() {
        let catalog = shop()
            .with_view("CUSTOMER_SUMMARY")
            .with_sequence("CUSTOMER_SEQ");

        let schema = crawl(&catalog, &config()).unwrap();
        let names: Vec<_> = schema.table_names().collect();
        assert_eq!(names, vec!["CUSTOMER", "ORDER"]);
        assert_eq!(schema.sequences, vec!["CUSTOMER_SEQ"]);
    }

    #[test]
    fn test_procedures_are_kept_verbatim() {
        let catalog = InMemoryCatalog::new()
            .with_procedure("recalc", "recalc_1")
            .with_procedure("archive", "archive_1")
            .with_procedure("recalc", "recalc_2")
            .with_procedure_row(
                CatalogRow::new()
                    .with(labels::PROCEDURE_NAME, "purge")
                    .with(labels::PROCEDURE_TYPE, "not a number"),
            );

        let schema = crawl(&catalog, &config()).unwrap();
        let names: Vec<_> = schema.functions.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["recalc", "archive", "recalc", "purge"]);

        assert_eq!(schema.functions[0].function_type, Some(1));
        assert_eq!(schema.function("recalc_2").unwrap().name, "recalc");
        assert!(schema.functions[3].function_type.is_none());
        assert_eq!(schema.functions[3].identity(), "purge");
    }

    #[test]
    fn test_column_flags_survive_the_crawl() {
        let catalog = InMemoryCatalog::new()
            .with_table("T")
            .with_column_row(
                "T",
                CatalogRow::new()
                    .with(labels::COLUMN_NAME, "id")
                    .with(labels::IS_NULLABLE, "NO")
                    .with(labels::IS_AUTOINCREMENT, "YES"),
            )
            .with_column_row("T", CatalogRow::new().with(labels::COLUMN_NAME, "note"));

        let schema = crawl(&catalog, &config()).unwrap();
        let columns = &schema.tables[0].columns;

        assert_eq!(columns[0].nullable, Flag::No);
        assert!(columns[0].is_auto_increment());
        assert_eq!(columns[1].nullable, Flag::Unknown);
        assert_eq!(columns[1].auto_increment, Flag::Unknown);
        assert!(columns[1].is_nullable());
        assert!(!columns[1].is_auto_increment());
    }

    #[test]
    fn test_crawl_is_idempotent() {
        let catalog = shop().with_sequence("ORDER_SEQ").with_procedure("p", "p1");

        let first = crawl(&catalog, &config()).unwrap();
        let second = crawl(&catalog, &config()).unwrap();

        assert_eq!(first, second);
        assert_eq!(first.fingerprint().unwrap(), second.fingerprint().unwrap());
    }

    #[test]
    fn test_crawler_can_crawl_twice() {
        let catalog = shop();
        let crawler = SchemaCrawler::connect(&catalog, &config()).unwrap();

        let first = crawler.crawl().unwrap();
        let second = crawler.crawl().unwrap();
        assert_eq!(first, second);
        assert_eq!(crawler.driver().name, "In-Memory Catalog");
    }

    #[test]
    fn test_driver_identity_is_recorded() {
        let catalog = shop().with_driver("TestDB", Some("9.1"));
        let schema = crawl(&catalog, &config()).unwrap();

        assert_eq!(schema.driver_name.as_deref(), Some("TestDB"));
        assert_eq!(schema.driver_version.as_deref(), Some("9.1"));
    }

    #[test]
    fn test_unknown_foreign_key_column_is_integrity_fault() {
        let catalog = shop().with_foreign_key("INVOICE", "customer_uid", "CUSTOMER", "uid");

        let err = crawl(&catalog, &config()).unwrap_err();
        assert!(err.is_integrity());
        match err {
            CrawlError::Integrity(fault) => {
                assert_eq!(fault.table, "CUSTOMER");
                assert_eq!(fault.column, "uid");
                assert_eq!(
                    fault.kind,
                    KeyKind::Exported {
                        fk_table: "INVOICE".to_string(),
                        fk_column: "customer_uid".to_string(),
                    }
                );
            }
            other => panic!("expected integrity fault, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_primary_key_column_is_integrity_fault() {
        let catalog = shop().with_primary_key("ORDER", "order_no", 2);

        let err = crawl(&catalog, &config()).unwrap_err();
        assert!(matches!(
            err,
            CrawlError::Integrity(ref fault) if fault.kind == KeyKind::Primary && fault.column == "order_no"
        ));
    }

    #[test]
    fn test_refused_connection_is_connectivity_error() {
        let catalog = shop().refusing_connections();

        let err = crawl(&catalog, &config()).unwrap_err();
        assert!(err.is_connectivity());
        assert!(err.stage().is_none());
        assert_eq!(catalog.connections_opened(), 0);
    }

    #[test]
    fn test_driver_info_failure_fails_fast() {
        let catalog = shop().failing_on(QueryKind::DriverInfo);

        let err = SchemaCrawler::connect(&catalog, &config()).err().unwrap();
        assert_eq!(err.stage(), Some(&Stage::DriverInfo));
        assert_eq!(catalog.connections_opened(), 1);
        assert_eq!(catalog.connections_open(), 0);
    }

    #[test]
    fn test_query_failures_name_their_stage() {
        let cases = [
            (shop().failing_on(QueryKind::Tables), Stage::Sequences),
            (shop().failing_on(QueryKind::Procedures), Stage::Procedures),
            (
                shop().failing_on_table(QueryKind::Columns, "ORDER"),
                Stage::Columns("ORDER".to_string()),
            ),
            (
                shop().failing_on_table(QueryKind::PrimaryKeys, "CUSTOMER"),
                Stage::PrimaryKeys("CUSTOMER".to_string()),
            ),
            (
                shop().failing_on_table(QueryKind::ExportedKeys, "CUSTOMER"),
                Stage::ExportedKeys("CUSTOMER".to_string()),
            ),
        ];

        for (catalog, stage) in cases {
            let err = crawl(&catalog, &config()).unwrap_err();
            assert_eq!(err.stage(), Some(&stage), "{err}");
            assert_eq!(catalog.connections_open(), 0);
        }
    }

    #[test]
    fn test_integrity_fault_releases_connections() {
        let catalog = shop().with_foreign_key("INVOICE", "customer_uid", "CUSTOMER", "uid");

        let err = crawl(&catalog, &config()).unwrap_err();
        assert!(err.is_integrity());
        assert!(catalog.connections_opened() > 0);
        assert_eq!(catalog.connections_open(), 0);
    }

    #[test]
    fn test_no_partial_schema_on_failure() {
        let catalog = shop().failing_on(QueryKind::Procedures);
        let result: Result<Schema, _> = crawl(&catalog, &config());
        assert!(result.is_err());
    }

    #[test]
    fn test_every_connection_is_released() {
        let catalog = shop().with_sequence("ORDER_SEQ");
        crawl(&catalog, &config()).unwrap();

        // bootstrap, sequences, tables, one per table, procedures
        assert_eq!(catalog.connections_opened(), 6);
        assert_eq!(catalog.connections_open(), 0);
    }

    #[test]
    fn test_invalid_pattern_is_rejected_before_connecting() {
        let catalog = shop();
        let config = config().with_table_patterns(["ORDER_("]);

        let err = crawl(&catalog, &config).unwrap_err();
        assert!(matches!(err, CrawlError::InvalidPattern(_)));
        assert_eq!(catalog.connections_opened(), 0);
    }
}
