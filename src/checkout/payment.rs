//! Payment

use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};

use crate::pricing::{Eur, Quote, format_amount};

/// How the shopper pays. Exactly one is selected per checkout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Paid online through PayPal before the order is created.
    PayPal,

    /// Cash on delivery.
    #[default]
    Cash,
}

impl Display for PaymentMethod {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::PayPal => f.write_str("paypal"),
            Self::Cash => f.write_str("cash"),
        }
    }
}

/// Settlement state recorded on a new order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// Nothing collected yet.
    #[default]
    Pending,

    /// Funds captured by the provider.
    Paid,
}

impl Display for PaymentStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Pending => f.write_str("pending"),
            Self::Paid => f.write_str("paid"),
        }
    }
}

impl PaymentMethod {
    /// Status a freshly created order carries for this method.
    pub fn initial_status(self) -> PaymentStatus {
        match self {
            Self::PayPal => PaymentStatus::Paid,
            Self::Cash => PaymentStatus::Pending,
        }
    }
}

/// Identifier the payment provider assigns to an authorization.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProviderOrderId(String);

impl ProviderOrderId {
    /// Wrap a provider-issued id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ProviderOrderId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.0)
    }
}

/// Amount breakdown sent to the payment provider.
///
/// Built from the same [`Quote`] later used for the order, so the provider and the order can
/// never disagree on what was charged.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaymentRequest {
    quote: Quote,
}

impl PaymentRequest {
    pub(crate) fn new(quote: Quote) -> Self {
        Self { quote }
    }

    /// ISO currency code.
    pub fn currency(&self) -> &'static str {
        self.quote.total().currency().iso_alpha_code
    }

    /// Items subtotal.
    pub fn item_total(&self) -> &Eur {
        self.quote.subtotal()
    }

    /// Shipping charge.
    pub fn shipping(&self) -> &Eur {
        self.quote.shipping()
    }

    /// Grand total.
    pub fn total(&self) -> &Eur {
        self.quote.total()
    }

    /// The quote this request was built from.
    pub fn quote(&self) -> &Quote {
        &self.quote
    }

    /// `(item_total, shipping, total)` as provider amount strings.
    pub fn amounts(&self) -> (String, String, String) {
        (
            format_amount(self.item_total()),
            format_amount(self.shipping()),
            format_amount(self.total()),
        )
    }
}

/// Confirmation that the provider collected the funds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentCapture {
    /// Provider order the capture belongs to
    pub order_id: ProviderOrderId,

    /// Provider transaction id of the capture, when reported
    pub capture_id: Option<String>,

    /// Provider status, e.g. `COMPLETED`
    pub status: String,
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use testresult::TestResult;

    use crate::{cart::items::CartItem, shipping::ShippingPolicy};

    use super::*;

    #[test]
    fn methods_serialize_like_the_api() -> TestResult {
        assert_eq!(serde_json::to_string(&PaymentMethod::PayPal)?, r#""paypal""#);
        assert_eq!(serde_json::to_string(&PaymentMethod::Cash)?, r#""cash""#);
        assert_eq!(serde_json::to_string(&PaymentStatus::Paid)?, r#""paid""#);
        assert_eq!(PaymentMethod::PayPal.to_string(), "paypal");
        assert_eq!(PaymentStatus::Paid.to_string(), "paid");
        assert_eq!(PaymentStatus::Pending.to_string(), "pending");

        Ok(())
    }

    #[test]
    fn initial_status_depends_on_method() {
        assert_eq!(PaymentMethod::Cash.initial_status(), PaymentStatus::Pending);
        assert_eq!(PaymentMethod::PayPal.initial_status(), PaymentStatus::Paid);
    }

    #[test]
    fn request_amounts_match_quote() {
        let items = [CartItem {
            id: "a".to_string(),
            name: "A".to_string(),
            image: String::new(),
            description: String::new(),
            price: Decimal::new(1250, 2),
            quantity: 4,
        }];

        let request = PaymentRequest::new(Quote::for_items(&items, &ShippingPolicy::default()));

        assert_eq!(request.currency(), "EUR");
        assert_eq!(
            request.amounts(),
            ("50.00".to_string(), "17.80".to_string(), "67.80".to_string())
        );
    }
}
