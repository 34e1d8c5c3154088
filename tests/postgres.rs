//! PostgreSQL integration tests.
//!
//! These tests need a live database reachable through the usual `DB_*`
//! environment variables (or a `.env` file) and a role allowed to create
//! schemas. They are behind the `integration-tests` feature flag:
//!
//! `cargo test --features integration-tests --test postgres`
//!
//! Every test works in its own schema so they can run concurrently.

#![cfg(feature = "integration-tests")]

use std::path::Path;
use std::sync::Arc;

use navigator::navigator::TableStats;
use navigator::prelude::*;
use navigator::schema::SearchKind;
use navigator::PostgresIntrospector;
use tokio_postgres::{Client, NoTls};

fn config() -> DbConfig {
    DbConfig::load(Path::new("./.env")).expect("database configuration")
}

async fn connect(config: &DbConfig) -> Client {
    let (client, connection) = tokio_postgres::connect(&config.postgres_connection_string(), NoTls)
        .await
        .expect("connect to PostgreSQL");
    tokio::spawn(async move {
        if let Err(e) = connection.await {
            eprintln!("connection error: {e}");
        }
    });
    client
}

/// Create `schema.test(id integer primary key, value integer)` with an index
/// on `value` and 100 rows, and return a navigator plus a side connection.
async fn setup(schema: &str) -> (Navigator, Client) {
    let config = config();
    let client = connect(&config).await;

    client
        .batch_execute(&format!(
            "DROP SCHEMA IF EXISTS {schema} CASCADE;
             CREATE SCHEMA {schema};
             CREATE TABLE {schema}.test (id integer PRIMARY KEY, value integer);
             CREATE INDEX test_value_idx ON {schema}.test (value);
             INSERT INTO {schema}.test SELECT i, i % 10 FROM generate_series(1, 100) AS i;"
        ))
        .await
        .expect("create fixture");

    let introspector = PostgresIntrospector::from_config(&config).expect("pool");
    (Navigator::new(Arc::new(introspector)), client)
}

async fn count_rows(client: &Client, schema: &str) -> i64 {
    client
        .query_one(&format!("SELECT count(*) FROM {schema}.test"), &[])
        .await
        .expect("count rows")
        .get(0)
}

#[tokio::test]
async fn test_schema_and_tables_listed() {
    let schema = "navigator_it_listing";
    let (navigator, _client) = setup(schema).await;

    let schemas = navigator.schemas().await.unwrap();
    assert!(schemas.schemas.iter().any(|s| s == schema));
    assert!(schemas.schemas.iter().all(|s| !s.starts_with("pg_")));

    let tables = navigator.tables(schema).await.unwrap();
    assert_eq!(tables.tables, vec!["test".to_string()]);
}

#[tokio::test]
async fn test_table_view_flags() {
    let schema = "navigator_it_flags";
    let (navigator, _client) = setup(schema).await;

    let view = navigator.table(schema, "test").await.unwrap();

    assert!(view.oid.is_some());
    assert_eq!(view.primary_keys, vec!["id".to_string()]);
    let id = &view.columns[0];
    let value = &view.columns[1];
    assert_eq!(id.name, "id");
    assert_eq!(id.data_type, DataType::Integer);
    assert!(!id.nullable);
    assert!(id.primary_key);
    assert!(!id.indexed);
    assert!(value.indexed);
    assert!(!value.primary_key);
    assert_eq!(view.indexes.len(), 1);
    assert_eq!(view.indexes[0].column_names, vec!["value".to_string()]);
}

#[tokio::test]
async fn test_unknown_objects_are_empty() {
    let schema = "navigator_it_unknown";
    let (navigator, _client) = setup(schema).await;

    let view = navigator.table(schema, "missing").await.unwrap();
    assert!(view.columns.is_empty());
    assert!(view.oid.is_none());

    let tables = navigator.tables("navigator_it_no_such_schema").await.unwrap();
    assert!(tables.tables.is_empty());
}

#[tokio::test]
async fn test_column_stats_after_refresh() {
    let schema = "navigator_it_stats";
    let (navigator, _client) = setup(schema).await;

    let err = navigator.column_stats(schema, "test", "id").await.unwrap_err();
    assert!(matches!(err, NavigatorError::NotFound { .. }));

    navigator
        .refresh_column_stats(schema, "test", "id")
        .await
        .unwrap();

    let stats = navigator.column_stats(schema, "test", "id").await.unwrap();
    assert_eq!(stats.column, "id");
    assert_eq!(stats.null_frac, Some(0.0));
    assert!(stats.histogram_bounds.is_some());
}

#[tokio::test]
async fn test_table_refresh_is_idempotent() {
    let schema = "navigator_it_refresh";
    let (navigator, _client) = setup(schema).await;

    navigator.refresh_table_stats(schema, "test").await.unwrap();
    let first = navigator.table_stats(schema, "test").await.unwrap();
    navigator.refresh_table_stats(schema, "test").await.unwrap();
    let second = navigator.table_stats(schema, "test").await.unwrap();

    let columns = |stats: &TableStats| {
        stats
            .columns
            .iter()
            .map(|s| s.column.clone())
            .collect::<Vec<_>>()
    };
    assert_eq!(columns(&first), vec!["id".to_string(), "value".to_string()]);
    assert_eq!(columns(&first), columns(&second));
}

#[tokio::test]
async fn test_query_never_persists() {
    let schema = "navigator_it_query";
    let (navigator, client) = setup(schema).await;

    let result = navigator
        .query(&format!("DELETE FROM {schema}.test"))
        .await
        .unwrap();
    assert!(result.result.is_some());
    assert_eq!(count_rows(&client, schema).await, 100);

    let result = navigator
        .query(&format!("SELECT id, NULL AS nothing FROM {schema}.test ORDER BY id LIMIT 2"))
        .await
        .unwrap()
        .result
        .unwrap();
    assert_eq!(result.columns, vec!["id".to_string(), "nothing".to_string()]);
    assert_eq!(
        result.rows,
        vec![
            vec![Some("1".to_string()), None],
            vec![Some("2".to_string()), None],
        ]
    );
}

#[tokio::test]
async fn test_malformed_query_rolls_back() {
    let schema = "navigator_it_malformed";
    let (navigator, client) = setup(schema).await;

    let err = navigator
        .query(&format!("DELETE FROM {schema}.test; SELEC 1"))
        .await
        .unwrap_err();

    assert!(matches!(err, NavigatorError::MalformedQuery(_)));
    assert_eq!(count_rows(&client, schema).await, 100);
}

#[tokio::test]
async fn test_query_cannot_end_its_transaction() {
    let schema = "navigator_it_commit";
    let (navigator, client) = setup(schema).await;

    for text in [
        format!("COMMIT; DELETE FROM {schema}.test"),
        format!("ROLLBACK; DELETE FROM {schema}.test WHERE id <= 10"),
    ] {
        let err = navigator.query(&text).await.unwrap_err();
        assert!(matches!(err, NavigatorError::MalformedQuery(_)));
    }
    assert_eq!(count_rows(&client, schema).await, 100);

    // A lone COMMIT carries no write with it
    navigator.query("COMMIT").await.unwrap();
    assert_eq!(count_rows(&client, schema).await, 100);
}

#[tokio::test]
async fn test_search() {
    let schema = "navigator_it_search";
    let (navigator, _client) = setup(schema).await;

    let results = navigator.search("navigator_it_sea").await.unwrap();
    assert_eq!(
        results.matches,
        vec![
            SearchMatch::schema(schema),
            SearchMatch::table(schema, "test"),
        ]
    );

    let results = navigator.search("tes").await.unwrap();
    let ours: Vec<_> = results
        .matches
        .iter()
        .filter(|m| m.title.starts_with(schema))
        .collect();
    assert_eq!(ours.len(), 1);
    assert_eq!(ours[0].kind, SearchKind::Table);
    assert_eq!(ours[0].title, format!("{schema}.test"));
}
