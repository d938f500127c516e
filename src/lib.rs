//! Nutricart
//!
//! Cart and checkout core for the clinic shop: a persistent cart store, banded shipping, and a
//! checkout state machine that produces exactly one order per checkout, paid on delivery or
//! through PayPal.

pub mod cart;
pub mod checkout;
pub mod orders;
pub mod prelude;
pub mod pricing;
pub mod products;
pub mod shipping;
pub mod storage;
