//! Payments

pub mod errors;
pub mod paypal;
pub mod provider;

pub use errors::PaymentError;
pub use paypal::{PayPalClient, PayPalConfig};
pub use provider::*;
