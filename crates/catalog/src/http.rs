//! Catalog client implementation using reqwest.

use std::time::Duration;

use async_trait::async_trait;
use common::ProductId;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use url::Url;

use crate::error::CatalogError;
use crate::record::{Product, Stock};
use crate::service::CatalogService;

const PRODUCTS: &str = "products";
const STOCK: &str = "stock";

/// Connection settings for the catalog HTTP API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogConfig {
    /// Base URL that `products/{id}` and `stock/{id}` are resolved against.
    pub base_url: String,
    /// Per-request timeout.
    pub timeout_secs: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3333".to_string(),
            timeout_secs: 10,
        }
    }
}

/// HTTP transport for the catalog API.
///
/// Performs exactly one request per call; there is no retry.
#[derive(Debug, Clone)]
pub struct HttpCatalogService {
    base_url: Url,
    client: Client,
}

impl HttpCatalogService {
    /// Creates a client for the configured catalog.
    pub fn new(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let mut base = config.base_url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { base_url, client })
    }

    /// Returns the normalized base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        resource: &'static str,
        id: ProductId,
    ) -> Result<T, CatalogError> {
        let url = self.base_url.join(&format!("{resource}/{id}"))?;
        tracing::debug!(%url, "catalog request");

        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Err(CatalogError::NotFound { resource, id });
        }
        if !status.is_success() {
            return Err(CatalogError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        response.json::<T>().await.map_err(|e| {
            if e.is_decode() {
                CatalogError::Decode(e)
            } else {
                CatalogError::Request(e)
            }
        })
    }
}

#[async_trait]
impl CatalogService for HttpCatalogService {
    #[tracing::instrument(skip(self))]
    async fn product(&self, id: ProductId) -> Result<Product, CatalogError> {
        let product: Product = self.fetch(PRODUCTS, id).await?;
        if product.id != id {
            return Err(CatalogError::MismatchedRecord {
                resource: PRODUCTS,
                requested: id,
                returned: product.id,
            });
        }
        Ok(product)
    }

    #[tracing::instrument(skip(self))]
    async fn stock(&self, id: ProductId) -> Result<Stock, CatalogError> {
        let stock: Stock = self.fetch(STOCK, id).await?;
        if stock.id != id {
            return Err(CatalogError::MismatchedRecord {
                resource: STOCK,
                requested: id,
                returned: stock.id,
            });
        }
        Ok(stock)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client_for(server: &mockito::Server) -> HttpCatalogService {
        HttpCatalogService::new(&CatalogConfig {
            base_url: server.url(),
            timeout_secs: 1,
        })
        .unwrap()
    }

    #[test]
    fn base_url_gets_trailing_slash() {
        let client = HttpCatalogService::new(&CatalogConfig {
            base_url: "http://shop.test/api".to_string(),
            timeout_secs: 1,
        })
        .unwrap();

        assert_eq!(client.base_url().as_str(), "http://shop.test/api/");
        assert_eq!(
            client.base_url().join("stock/3").unwrap().as_str(),
            "http://shop.test/api/stock/3"
        );
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let result = HttpCatalogService::new(&CatalogConfig {
            base_url: "not a url".to_string(),
            timeout_secs: 1,
        });

        assert!(matches!(result, Err(CatalogError::InvalidUrl(_))));
    }

    #[tokio::test]
    async fn product_success() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/products/5")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id": 5, "name": "X", "price": 10}"#)
            .create_async()
            .await;

        let product = client_for(&server).product(ProductId::new(5)).await.unwrap();

        let expected = Product::new(5u64)
            .with_attribute("name", "X")
            .with_attribute("price", 10);
        assert_eq!(product, expected);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn stock_success() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/stock/1")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id": 1, "amount": 3}"#)
            .create_async()
            .await;

        let stock = client_for(&server).stock(ProductId::new(1)).await.unwrap();

        assert_eq!(stock, Stock::new(1u64, 3));
    }

    #[tokio::test]
    async fn missing_product_maps_to_not_found() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/products/404")
            .with_status(404)
            .with_body("{}")
            .create_async()
            .await;

        let result = client_for(&server).product(ProductId::new(404)).await;

        assert!(result.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn server_error_maps_to_status() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/stock/2")
            .with_status(500)
            .expect(1)
            .create_async()
            .await;

        let result = client_for(&server).stock(ProductId::new(2)).await;

        assert!(matches!(result, Err(CatalogError::Status { status: 500, .. })));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn malformed_body_maps_to_decode() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/stock/2")
            .with_status(200)
            .with_body(r#"{"id": 2, "amount": "lots"}"#)
            .create_async()
            .await;

        let result = client_for(&server).stock(ProductId::new(2)).await;

        assert!(matches!(result, Err(CatalogError::Decode(_))));
    }

    #[tokio::test]
    async fn record_for_other_product_is_rejected() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/products/7")
            .with_status(200)
            .with_body(r#"{"id": 8, "title": "Wrong"}"#)
            .create_async()
            .await;

        let result = client_for(&server).product(ProductId::new(7)).await;

        assert!(matches!(
            result,
            Err(CatalogError::MismatchedRecord { returned, .. }) if returned == ProductId::new(8)
        ));
    }

    #[tokio::test]
    async fn non_json_body_maps_to_decode() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/products/3")
            .with_status(200)
            .with_header("content-type", "text/html")
            .with_body("<html>maintenance</html>")
            .create_async()
            .await;

        let result = client_for(&server).product(ProductId::new(3)).await;

        let err = result.unwrap_err();
        assert!(matches!(err, CatalogError::Decode(_)));
        assert!(!err.is_not_found());
    }

    #[tokio::test]
    async fn unreachable_server_maps_to_request_error() {
        let client = HttpCatalogService::new(&CatalogConfig {
            base_url: "http://127.0.0.1:1".to_string(),
            timeout_secs: 1,
        })
        .unwrap();

        let result = client.stock(ProductId::new(1)).await;

        assert!(matches!(result, Err(CatalogError::Request(_))));
    }
}
