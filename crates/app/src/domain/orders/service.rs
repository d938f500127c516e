//! Orders service.

use async_trait::async_trait;
use mockall::automock;
use nutricart::orders::{NewOrder, Order};
use reqwest::StatusCode;
use tracing::info;

use crate::{
    domain::orders::errors::OrdersServiceError,
    http::{ApiClient, failure},
};

/// Order API of the shop backend.
#[derive(Debug, Clone)]
pub struct HttpOrdersService {
    api: ApiClient,
}

impl HttpOrdersService {
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl OrdersService for HttpOrdersService {
    async fn create_order(&self, order: NewOrder) -> Result<Order, OrdersServiceError> {
        let response = self
            .api
            .http()
            .post(self.api.url("orders"))
            .json(&order)
            .send()
            .await?;

        let status = response.status();

        if status.is_success() {
            let created: Order = response.json().await?;

            info!(
                order = %created.id,
                order_number = %created.order_number,
                payment_method = %created.payment_method,
                "order created"
            );

            return Ok(created);
        }

        let (status, text) = failure(response).await;

        if status == StatusCode::BAD_REQUEST || status == StatusCode::UNPROCESSABLE_ENTITY {
            Err(OrdersServiceError::Rejected(text))
        } else {
            Err(OrdersServiceError::UnexpectedResponse(format!(
                "create order failed with status {status}: {text}"
            )))
        }
    }

    async fn get_order(&self, id: &str) -> Result<Order, OrdersServiceError> {
        let response = self
            .api
            .http()
            .get(self.api.url(&format!("orders/{id}")))
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => Ok(response.json().await?),
            StatusCode::NOT_FOUND => Err(OrdersServiceError::NotFound),
            _ => {
                let (status, text) = failure(response).await;

                Err(OrdersServiceError::UnexpectedResponse(format!(
                    "get order failed with status {status}: {text}"
                )))
            }
        }
    }
}

#[automock]
#[async_trait]
pub trait OrdersService: Send + Sync {
    /// Persist a new order. Called at most once per checkout.
    async fn create_order(&self, order: NewOrder) -> Result<Order, OrdersServiceError>;

    /// Retrieve a single order.
    async fn get_order(&self, id: &str) -> Result<Order, OrdersServiceError>;
}
