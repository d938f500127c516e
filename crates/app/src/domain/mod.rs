//! Nutricart Domain Concerns

pub mod checkout;
pub mod orders;
pub mod payments;
pub mod products;
