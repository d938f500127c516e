//! Nutricart application services: remote catalog, orders, PayPal and checkout orchestration.

pub mod config;
pub mod context;
pub mod domain;
pub mod http;
pub mod observability;
