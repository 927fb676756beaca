//! HTTP API server exposing the cart manager.
//!
//! One process serves one cart session. The manager is built once at
//! startup and handed to every handler through [`AppState`].

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post, put};
use cart_store::{
    FileKeyValueStore, InMemoryKeyValueStore, KeyValueStore, PostgresKeyValueStore, StoreError,
};
use catalog::{CatalogService, HttpCatalogService};
use domain::CartManager;
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use config::{Config, StorageBackend};
use error::StartupError;

/// Cart manager over type-erased store and catalog.
pub type SharedCartManager = CartManager<Arc<dyn KeyValueStore>, Arc<dyn CatalogService>>;

/// Shared application state accessible from all handlers.
pub struct AppState {
    pub cart: SharedCartManager,
}

/// Creates the Axum application router with all routes and shared state.
pub fn create_app(state: Arc<AppState>, metrics_handle: PrometheusHandle) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route("/cart", get(routes::cart::get))
        .route("/cart/items", post(routes::cart::add))
        .route(
            "/cart/items/{id}",
            put(routes::cart::update_amount).delete(routes::cart::remove),
        )
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Opens the configured storage backend.
///
/// The PostgreSQL backend runs its migrations before it is returned.
pub async fn open_store(backend: &StorageBackend) -> Result<Arc<dyn KeyValueStore>, StoreError> {
    let store: Arc<dyn KeyValueStore> = match backend {
        StorageBackend::Memory => Arc::new(InMemoryKeyValueStore::new()),
        StorageBackend::File { path } => Arc::new(FileKeyValueStore::new(path)),
        StorageBackend::Postgres { url } => {
            let store = PostgresKeyValueStore::connect(url).await?;
            store.run_migrations().await?;
            Arc::new(store)
        }
    };
    Ok(store)
}

/// Builds application state from explicit collaborators.
pub async fn create_state(
    store: Arc<dyn KeyValueStore>,
    catalog: Arc<dyn CatalogService>,
    storage_key: &str,
) -> Result<Arc<AppState>, StartupError> {
    let cart = CartManager::load_with_key(store, catalog, storage_key).await?;
    Ok(Arc::new(AppState { cart }))
}

/// Builds application state from configuration.
pub async fn create_state_from_config(config: &Config) -> Result<Arc<AppState>, StartupError> {
    let store = open_store(&config.storage).await?;
    let catalog: Arc<dyn CatalogService> = Arc::new(HttpCatalogService::new(&config.catalog)?);
    create_state(store, catalog, &config.storage_key).await
}
