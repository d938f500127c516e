//! Checkout
//!
//! Turns a non-empty cart and a complete form into exactly one order, paid either on delivery
//! or through PayPal before the order is created.

use thiserror::Error;

pub mod form;
pub mod payment;
pub mod session;

pub use form::{CheckoutForm, FormField};
pub use payment::{PaymentCapture, PaymentMethod, PaymentRequest, PaymentStatus, ProviderOrderId};
pub use session::{CheckoutEntry, CheckoutPhase, CheckoutSession};

/// Reasons a checkout step is refused.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CheckoutError {
    /// There is nothing in the cart to order.
    #[error("cart is empty")]
    EmptyCart,

    /// Required form fields are blank.
    #[error("missing required fields: {}", field_list(.0))]
    IncompleteForm(Vec<FormField>),

    /// The step belongs to the other payment method.
    #[error("not available when paying with {0}")]
    WrongPaymentMethod(PaymentMethod),

    /// A submission for this checkout is already in flight.
    #[error("order submission already in progress")]
    SubmissionInProgress,

    /// This checkout already produced its order.
    #[error("order already placed for this checkout")]
    AlreadyCompleted,

    /// No submission is in flight to attach the result to.
    #[error("no order submission in progress")]
    NotSubmitting,

    /// The provider order is not the one authorized in this checkout.
    #[error("unknown payment order {0}")]
    UnknownPaymentOrder(ProviderOrderId),

    /// The cart changed after the amounts were authorized.
    #[error("cart changed after payment was authorized")]
    QuoteChanged,

    /// Funds are already captured for this checkout.
    #[error("payment already captured for this checkout")]
    PaymentAlreadyCaptured,

    /// No capture has been recorded yet.
    #[error("payment has not been captured")]
    PaymentNotCaptured,
}

fn field_list(fields: &[FormField]) -> String {
    fields
        .iter()
        .map(|field| field.name())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn incomplete_form_lists_fields() {
        let error = CheckoutError::IncompleteForm(vec![FormField::Email, FormField::ZipCode]);

        assert_eq!(error.to_string(), "missing required fields: email, zipCode");
    }
}
