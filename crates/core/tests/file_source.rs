use std::fs;

use schemaforge_core::prelude::*;
use serde_json::json;

fn write_snapshot(dir: &std::path::Path, table: &str, body: serde_json::Value) {
    fs::write(dir.join(format!("{table}.json")), body.to_string()).unwrap();
}

#[tokio::test]
async fn reads_snapshot_from_directory() {
    let dir = tempfile::tempdir().unwrap();
    write_snapshot(
        dir.path(),
        "customers",
        json!({
            "table": "customers",
            "columns": [
                { "name": "id", "type": "uuid", "primary": true },
                { "name": "email", "type": "string", "not_null": true, "check": "length(email) <= 255" }
            ],
            "rls": { "select": true, "insert": true, "update": true, "delete": false },
            "triggers": [{ "name": "touch_updated_at", "event": "UPDATE", "function": "EXECUTE FUNCTION touch()" }]
        }),
    );

    let injector = SchemaInjector::new(FileSchemaSource::new(dir.path()));
    let schema = injector.get_schema("customers").await.unwrap();

    assert_eq!(schema.columns[1].check.as_deref(), Some("length(email) <= 255"));
    assert!(!schema.rls.delete);
    assert_eq!(schema.triggers.as_ref().map(Vec::len), Some(1));
}

#[tokio::test]
async fn missing_snapshot_is_an_error_not_sample_data() {
    let dir = tempfile::tempdir().unwrap();
    let source = FileSchemaSource::new(dir.path());

    let err = source.fetch_schema("invoices").await.unwrap_err();

    assert!(matches!(err, SchemaError::Snapshot { ref table, .. } if table == "invoices"));
}

#[tokio::test]
async fn snapshot_is_validated() {
    let dir = tempfile::tempdir().unwrap();
    write_snapshot(
        dir.path(),
        "orders",
        json!({ "table": "orders", "columns": [{ "name": "id" }], "rls": {} }),
    );

    let err = FileSchemaSource::new(dir.path())
        .fetch_schema("orders")
        .await
        .unwrap_err();

    assert!(err.is_shape_error());
    assert!(err.to_string().contains("columns[0].type is missing"));
}

#[tokio::test]
async fn rejects_path_like_table_names() {
    let dir = tempfile::tempdir().unwrap();
    let source = FileSchemaSource::new(dir.path());

    assert!(source.fetch_schema("../etc/passwd").await.is_err());
    assert!(source.fetch_schema(".hidden").await.is_err());
}

#[tokio::test]
async fn lists_json_snapshots_only() {
    let dir = tempfile::tempdir().unwrap();
    write_snapshot(dir.path(), "orders", json!({}));
    write_snapshot(dir.path(), "customers", json!({}));
    fs::write(dir.path().join("README.md"), "snapshots").unwrap();
    fs::create_dir(dir.path().join("archive")).unwrap();

    let tables = FileSchemaSource::new(dir.path()).list_tables().await.unwrap();

    assert_eq!(tables, ["customers", "orders"]);
}

#[tokio::test]
async fn reads_optional_ui_metadata() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("ui")).unwrap();
    fs::write(
        dir.path().join("ui/invoices.json"),
        json!({
            "table_name": "invoices",
            "form": { "fields": [{ "field_name": "status", "hidden": true }] }
        })
        .to_string(),
    )
    .unwrap();
    let source = FileSchemaSource::new(dir.path());

    let ui = source.fetch_ui_metadata("invoices").await.unwrap().unwrap();
    assert!(ui.field("status").unwrap().hidden);
    assert_eq!(source.fetch_ui_metadata("customers").await.unwrap(), None);

    // The ui/ directory is not a table
    assert!(source.list_tables().await.unwrap().is_empty());
}
