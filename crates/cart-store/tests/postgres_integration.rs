//! PostgreSQL integration tests
//!
//! These tests use a shared PostgreSQL container for efficiency.
//! Run with:
//!
//! ```bash
//! cargo test -p cart-store --test postgres_integration -- --test-threads=1
//! ```

use std::sync::Arc;

use cart_store::{KeyValueStore, KeyValueStoreExt, PostgresKeyValueStore};
use sqlx::PgPool;
use testcontainers::{ContainerAsync, runners::AsyncRunner};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;

/// Shared container info - container stays alive for all tests
struct ContainerInfo {
    #[allow(dead_code)] // Container must stay alive for tests
    container: ContainerAsync<Postgres>,
    connection_string: String,
}

/// Global shared container
static CONTAINER: OnceCell<Arc<ContainerInfo>> = OnceCell::const_new();

async fn get_container_info() -> Arc<ContainerInfo> {
    CONTAINER
        .get_or_init(|| async {
            let container = Postgres::default().start().await.unwrap();

            let host = container.get_host().await.unwrap();
            let port = container.get_host_port_ipv4(5432).await.unwrap();

            let connection_string =
                format!("postgres://postgres:postgres@{}:{}/postgres", host, port);

            let pool = PgPool::connect(&connection_string).await.unwrap();
            PostgresKeyValueStore::new(pool.clone())
                .run_migrations()
                .await
                .unwrap();
            pool.close().await;

            Arc::new(ContainerInfo {
                container,
                connection_string,
            })
        })
        .await
        .clone()
}

/// Get a fresh store with its own pool and a cleared table
async fn get_test_store() -> PostgresKeyValueStore {
    let info = get_container_info().await;

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&info.connection_string)
        .await
        .unwrap();

    sqlx::query("TRUNCATE TABLE key_value_store")
        .execute(&pool)
        .await
        .unwrap();

    PostgresKeyValueStore::new(pool)
}

#[tokio::test]
async fn get_missing_key_returns_none() {
    let store = get_test_store().await;

    assert!(store.get("@RocketShoes:cart").await.unwrap().is_none());
}

#[tokio::test]
async fn set_then_get_roundtrip() {
    let store = get_test_store().await;

    store
        .set("@RocketShoes:cart", r#"[{"id":1,"amount":2}]"#.to_string())
        .await
        .unwrap();

    let value = store.get("@RocketShoes:cart").await.unwrap();
    assert_eq!(value.as_deref(), Some(r#"[{"id":1,"amount":2}]"#));
}

#[tokio::test]
async fn set_overwrites_existing_row() {
    let store = get_test_store().await;

    store.set("cart", "[]".to_string()).await.unwrap();
    store.set("cart", "[1]".to_string()).await.unwrap();

    assert_eq!(store.get("cart").await.unwrap().as_deref(), Some("[1]"));

    let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM key_value_store")
        .fetch_one(store.pool())
        .await
        .unwrap();
    assert_eq!(rows, 1);
}

#[tokio::test]
async fn remove_deletes_row() {
    let store = get_test_store().await;

    store.set("cart", "[]".to_string()).await.unwrap();
    store.remove("cart").await.unwrap();
    store.remove("cart").await.unwrap();

    assert!(!store.contains_key("cart").await.unwrap());
}

#[tokio::test]
async fn json_helpers_work_against_postgres() {
    let store = get_test_store().await;

    store.set_json("numbers", &[3u32, 1, 2]).await.unwrap();
    let loaded: Option<Vec<u32>> = store.get_json("numbers").await.unwrap();

    assert_eq!(loaded, Some(vec![3, 1, 2]));
}
