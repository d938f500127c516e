//! App Context

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    sync::Arc,
};

use nutricart::{cart::CartStore, shipping::ShippingPolicy, storage::FileStorage};
use reqwest::Client;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::{
    config::AppConfig,
    domain::{
        checkout::{CheckoutService, SharedCart},
        orders::{HttpOrdersService, OrdersService},
        payments::{PayPalClient, PaymentProvider},
        products::{HttpProductsService, ProductsService},
    },
    http::ApiClient,
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to build http client")]
    HttpClient(#[source] reqwest::Error),
}

#[derive(Clone)]
pub struct AppContext {
    pub products: Arc<dyn ProductsService>,
    pub orders: Arc<dyn OrdersService>,
    pub payments: Option<Arc<dyn PaymentProvider>>,
    pub cart: SharedCart,
    pub shipping: ShippingPolicy,
}

impl Debug for AppContext {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("AppContext")
            .field("cart", &self.cart)
            .field("payments", &self.payments.is_some())
            .finish_non_exhaustive()
    }
}

impl AppContext {
    /// Build application context from configuration, loading the persisted cart.
    ///
    /// # Errors
    ///
    /// Returns an error when the HTTP client cannot be built.
    pub fn from_config(config: &AppConfig) -> Result<Self, AppInitError> {
        let http = Client::builder()
            .user_agent(concat!("nutricart/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(AppInitError::HttpClient)?;

        let api = ApiClient::with_client(&config.shop.api_url, http.clone());

        let payments: Option<Arc<dyn PaymentProvider>> = match config.paypal.config() {
            Some(paypal) => Some(Arc::new(PayPalClient::with_client(paypal, http))),
            None => {
                warn!("PayPal credentials not configured, only cash on delivery is available");
                None
            }
        };

        let cart = CartStore::load(Box::new(FileStorage::new(config.shop.cart_path.clone())));

        debug!(
            cart_path = %config.shop.cart_path.display(),
            lines = cart.line_count(),
            "cart loaded"
        );

        Ok(Self {
            products: Arc::new(HttpProductsService::new(api.clone())),
            orders: Arc::new(HttpOrdersService::new(api)),
            payments,
            cart: Arc::new(Mutex::new(cart)),
            shipping: ShippingPolicy::default(),
        })
    }

    /// A fresh checkout over the shared cart.
    #[must_use]
    pub fn checkout(&self) -> CheckoutService {
        CheckoutService::new(
            Arc::clone(&self.cart),
            Arc::clone(&self.orders),
            self.payments.clone(),
            self.shipping,
        )
    }
}
