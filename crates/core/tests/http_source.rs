use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use schemaforge_core::prelude::*;
use serde_json::json;

#[derive(Clone, Default)]
struct ServerState {
    schema_calls: Arc<AtomicUsize>,
    cache_clears: Arc<AtomicUsize>,
}

async fn schema(
    State(state): State<ServerState>,
    Path(table): Path<String>,
    headers: HeaderMap,
) -> Response {
    state.schema_calls.fetch_add(1, Ordering::SeqCst);

    match table.as_str() {
        "invoices" => Json(json!({
            "table": "invoices",
            "columns": [
                { "name": "id", "type": "uuid", "primary": true, "not_null": true },
                { "name": "customer_id", "type": "string", "foreign_key": "customers.id" },
                { "name": "amount", "type": "numeric", "not_null": true },
                { "name": "status", "type": "string", "enum_values": ["open", "paid", "overdue"] }
            ],
            "rls": { "select": true, "insert": true, "update": false, "delete": false }
        }))
        .into_response(),
        "secured" => {
            let authorized = headers
                .get("authorization")
                .and_then(|v| v.to_str().ok())
                .is_some_and(|v| v == "Bearer s3cret");
            if !authorized {
                return StatusCode::UNAUTHORIZED.into_response();
            }
            Json(json!({
                "table": "secured",
                "columns": [],
                "rls": { "select": true, "insert": false, "update": false, "delete": false }
            }))
            .into_response()
        }
        "broken" => Json(json!({ "table": "broken", "columns": [] })).into_response(),
        "slow" => {
            tokio::time::sleep(Duration::from_secs(5)).await;
            StatusCode::OK.into_response()
        }
        "exploding" => (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response(),
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn ui_metadata(Path(table): Path<String>) -> Response {
    match table.as_str() {
        "invoices" => Json(json!({
            "success": true,
            "data": {
                "table_name": "invoices",
                "form": {
                    "fields": [{ "field_name": "amount", "label": "Betrag (EUR)", "order": 1, "readonly": true }]
                }
            }
        }))
        .into_response(),
        "exploding" => (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response(),
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn tables() -> Json<serde_json::Value> {
    Json(json!({ "tables": ["customers", "invoices"] }))
}

async fn clear(State(state): State<ServerState>) -> Json<serde_json::Value> {
    state.cache_clears.fetch_add(1, Ordering::SeqCst);
    Json(json!({ "message": "cache cleared" }))
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "healthy", "provider_initialized": true, "supabase_connected": false }))
}

async fn spawn_server() -> (String, ServerState) {
    let state = ServerState::default();
    let app = Router::new()
        .route("/api/schema/{table}", get(schema))
        .route("/api/ui/complete/{table}", get(ui_metadata))
        .route("/api/tables", get(tables))
        .route("/api/cache/clear", post(clear))
        .route("/api/health", get(health))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{addr}"), state)
}

/// Address of a port that nothing listens on.
async fn closed_port() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

#[tokio::test]
async fn fetches_and_validates_schema() {
    let (url, _) = spawn_server().await;
    let source = HttpSchemaSource::new(&url).unwrap();

    let schema = source.fetch_schema("invoices").await.expect("fetch should succeed");

    assert_eq!(schema.table, "invoices");
    assert_eq!(
        schema.columns.iter().map(|c| c.name.as_str()).collect::<Vec<_>>(),
        ["id", "customer_id", "amount", "status"]
    );
    assert_eq!(schema.rls, RowLevelSecurity::append_only());
}

#[tokio::test]
async fn injector_serves_second_request_from_cache() {
    let (url, state) = spawn_server().await;
    let injector = SchemaInjector::new(HttpSchemaSource::new(&url).unwrap());

    injector.get_schema("invoices").await.unwrap();
    injector.get_schema("invoices").await.unwrap();

    assert_eq!(state.schema_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn sends_bearer_token() {
    let (url, _) = spawn_server().await;

    let anonymous = HttpSchemaSource::new(&url).unwrap();
    let err = anonymous.fetch_schema("secured").await.unwrap_err();
    assert!(matches!(
        err,
        SchemaError::Status { ref table, status } if table == "secured" && status == 401
    ));

    let authorized = HttpSchemaSource::new(&url).unwrap().with_token("s3cret");
    let schema = authorized.fetch_schema("secured").await.unwrap();
    assert!(schema.columns.is_empty());
}

#[tokio::test]
async fn non_success_status_names_table_and_status() {
    let (url, _) = spawn_server().await;
    let source = HttpSchemaSource::new(&url).unwrap();

    let err = source.fetch_schema("exploding").await.unwrap_err();

    let message = err.to_string();
    assert!(message.contains("exploding"), "{message}");
    assert!(message.contains("500"), "{message}");
}

#[tokio::test]
async fn shape_mismatch_is_reported() {
    let (url, _) = spawn_server().await;
    let injector = SchemaInjector::new(HttpSchemaSource::new(&url).unwrap());

    let err = injector.get_schema("broken").await.unwrap_err();

    assert!(err.is_shape_error());
    assert!(err.to_string().contains("rls is missing"));
    assert_eq!(injector.cache_status().await.entries, 0);
}

#[tokio::test]
async fn slow_server_times_out() {
    let (url, _) = spawn_server().await;
    let source = HttpSchemaSource::new(&url)
        .unwrap()
        .with_timeout(Duration::from_millis(100));

    let err = source.fetch_schema("slow").await.unwrap_err();

    assert!(matches!(err, SchemaError::Timeout { ref table, .. } if table == "slow"));
    assert!(err.is_network_error());
}

#[tokio::test]
async fn unreachable_endpoint_leaves_cache_empty() {
    let url = closed_port().await;
    let injector = SchemaInjector::new(HttpSchemaSource::new(&url).unwrap());

    let err = injector.get_schema("invoices").await.unwrap_err();

    assert!(matches!(err, SchemaError::Transport { .. }), "{err:?}");
    assert!(err.to_string().contains("invoices"));
    let status = injector.cache_status().await;
    assert_eq!(status.entries, 0);
    assert!(status.tables.is_empty());
}

#[tokio::test]
async fn remote_operations() {
    let (url, state) = spawn_server().await;
    let source = HttpSchemaSource::new(&url).unwrap();
    let injector = SchemaInjector::new(source.clone());
    injector.get_schema("invoices").await.unwrap();

    assert_eq!(source.list_tables().await.unwrap(), ["customers", "invoices"]);
    assert!(source.health().await.unwrap().is_healthy());

    source.clear_remote_cache().await.unwrap();
    assert_eq!(state.cache_clears.load(Ordering::SeqCst), 1);
    assert_eq!(
        injector.cache_status().await.entries,
        1,
        "remote clear does not touch the local cache"
    );
}

#[tokio::test]
async fn fetches_ui_metadata() {
    let (url, _) = spawn_server().await;
    let source = HttpSchemaSource::new(&url).unwrap();

    let ui = source.fetch_ui_metadata("invoices").await.unwrap().expect("metadata for invoices");
    let amount = ui.field("amount").unwrap();
    assert_eq!(amount.label.as_deref(), Some("Betrag (EUR)"));
    assert!(amount.readonly);

    assert_eq!(source.fetch_ui_metadata("customers").await.unwrap(), None);
    assert!(matches!(
        source.fetch_ui_metadata("exploding").await,
        Err(SchemaError::Status { status, .. }) if status == 500
    ));
}
