//! Products service.

use async_trait::async_trait;
use mockall::automock;
use nutricart::products::Product;
use reqwest::StatusCode;
use tracing::debug;

use crate::{
    domain::products::errors::ProductsServiceError,
    http::{ApiClient, failure},
};

/// Catalog backed by the shop's REST API.
#[derive(Debug, Clone)]
pub struct HttpProductsService {
    api: ApiClient,
}

impl HttpProductsService {
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl ProductsService for HttpProductsService {
    async fn list_products(
        &self,
        featured: Option<bool>,
    ) -> Result<Vec<Product>, ProductsServiceError> {
        let mut request = self.api.http().get(self.api.url("products"));

        if let Some(featured) = featured {
            request = request.query(&[("featured", featured)]);
        }

        let response = request.send().await?;

        if !response.status().is_success() {
            let (status, text) = failure(response).await;

            return Err(ProductsServiceError::UnexpectedResponse(format!(
                "list products failed with status {status}: {text}"
            )));
        }

        let products: Vec<Product> = response.json().await?;

        debug!(count = products.len(), "products listed");

        Ok(products)
    }

    async fn get_product(&self, id: &str) -> Result<Product, ProductsServiceError> {
        let response = self
            .api
            .http()
            .get(self.api.url(&format!("products/{id}")))
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => Ok(response.json().await?),
            StatusCode::NOT_FOUND => Err(ProductsServiceError::NotFound),
            _ => {
                let (status, text) = failure(response).await;

                Err(ProductsServiceError::UnexpectedResponse(format!(
                    "get product failed with status {status}: {text}"
                )))
            }
        }
    }
}

#[automock]
#[async_trait]
pub trait ProductsService: Send + Sync {
    /// Retrieves the catalog, optionally only featured products.
    async fn list_products(
        &self,
        featured: Option<bool>,
    ) -> Result<Vec<Product>, ProductsServiceError>;

    /// Retrieve a single product.
    async fn get_product(&self, id: &str) -> Result<Product, ProductsServiceError>;
}

/// Fetch a product that can be put in the cart.
///
/// # Errors
///
/// Returns [`ProductsServiceError::OutOfStock`] for products not currently sold, or any error
/// from the catalog.
pub async fn fetch_orderable(
    products: &dyn ProductsService,
    id: &str,
) -> Result<Product, ProductsServiceError> {
    let product = products.get_product(id).await?;

    if product.in_stock {
        Ok(product)
    } else {
        Err(ProductsServiceError::OutOfStock(product.id))
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use testresult::TestResult;

    use super::*;

    fn product(in_stock: bool) -> Product {
        Product {
            id: "p-1".to_string(),
            name: "Omega 3".to_string(),
            category: "integratori".to_string(),
            price: Decimal::new(19_90, 2),
            image: String::new(),
            description: String::new(),
            in_stock,
            featured: false,
        }
    }

    #[tokio::test]
    async fn fetch_orderable_returns_stocked_product() -> TestResult {
        let mut products = MockProductsService::new();

        products
            .expect_get_product()
            .once()
            .withf(|id| id == "p-1")
            .return_once(|_| Ok(product(true)));

        products.expect_list_products().never();

        let found = fetch_orderable(&products, "p-1").await?;

        assert_eq!(found.id, "p-1");

        Ok(())
    }

    #[tokio::test]
    async fn fetch_orderable_rejects_out_of_stock() {
        let mut products = MockProductsService::new();

        products
            .expect_get_product()
            .once()
            .return_once(|_| Ok(product(false)));

        let result = fetch_orderable(&products, "p-1").await;

        assert!(
            matches!(result, Err(ProductsServiceError::OutOfStock(ref id)) if id == "p-1"),
            "expected OutOfStock, got {result:?}"
        );
    }

    #[tokio::test]
    async fn fetch_orderable_passes_not_found_through() {
        let mut products = MockProductsService::new();

        products
            .expect_get_product()
            .once()
            .return_once(|_| Err(ProductsServiceError::NotFound));

        let result = fetch_orderable(&products, "missing").await;

        assert!(
            matches!(result, Err(ProductsServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }
}
