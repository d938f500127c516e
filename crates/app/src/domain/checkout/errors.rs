//! Checkout service errors.

use nutricart::checkout::{CheckoutError, ProviderOrderId};
use thiserror::Error;

use crate::domain::{orders::OrdersServiceError, payments::PaymentError};

#[derive(Debug, Error)]
pub enum CheckoutServiceError {
    #[error(transparent)]
    Checkout(#[from] CheckoutError),

    #[error("order submission failed: {0}")]
    Orders(#[from] OrdersServiceError),

    #[error("payment failed: {0}")]
    Payment(#[from] PaymentError),

    /// No payment provider is configured.
    #[error("PayPal payments are not configured")]
    PaymentUnavailable,

    /// Funds were captured but the order could not be created. Retrying reuses the capture.
    #[error("payment {order_id} captured but the order was not recorded: {source}")]
    OrderNotRecorded {
        order_id: ProviderOrderId,
        source: OrdersServiceError,
    },
}
