//! Payment provider seam.

use async_trait::async_trait;
use mockall::automock;
use nutricart::checkout::{PaymentCapture, PaymentRequest, ProviderOrderId};

use crate::domain::payments::errors::PaymentError;

/// A provider order waiting for the shopper's approval.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentApproval {
    /// Provider order id, echoed back on approval.
    pub order_id: ProviderOrderId,

    /// Where the shopper approves the payment.
    pub approve_url: String,
}

#[automock]
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Register the amounts with the provider and obtain an approval link.
    async fn create_order(
        &self,
        request: &PaymentRequest,
    ) -> Result<PaymentApproval, PaymentError>;

    /// Collect the funds of an approved order.
    ///
    /// Capturing an order twice must not charge twice.
    async fn capture(&self, order_id: &ProviderOrderId) -> Result<PaymentCapture, PaymentError>;
}
