//! Orders
//!
//! Wire model of the order-creation API. An order is a snapshot: once built from a cart and a
//! checkout form it no longer tracks either.

use std::fmt::{Display, Formatter, Result as FmtResult};

use jiff::civil::DateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    cart::items::CartItem,
    checkout::payment::{PaymentMethod, PaymentStatus},
};

/// A purchased line, copied from the cart at submission time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: String,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub quantity: u32,
    #[serde(default)]
    pub image: String,
}

impl From<&CartItem> for OrderItem {
    fn from(item: &CartItem) -> Self {
        Self {
            product_id: item.id.clone(),
            name: item.name.clone(),
            price: item.price,
            quantity: item.quantity,
            image: item.image.clone(),
        }
    }
}

/// Customer contact details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
}

/// Delivery address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    pub address: String,
    pub city: String,
    pub zip_code: String,
    #[serde(default)]
    pub notes: String,
}

/// Fulfilment status, owned by the back office.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    Shipped,
    Delivered,
    Cancelled,
}

impl Display for OrderStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        })
    }
}

/// Order creation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    pub items: Vec<OrderItem>,
    pub customer: Customer,
    pub shipping: ShippingAddress,
    /// Items subtotal plus shipping
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
    pub paypal_order_id: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub shipping_cost: Decimal,
}

/// Order as persisted by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub order_number: String,
    pub items: Vec<OrderItem>,
    pub customer: Customer,
    pub shipping: ShippingAddress,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    #[serde(default)]
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub payment_status: PaymentStatus,
    #[serde(default)]
    pub paypal_order_id: Option<String>,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub shipping_cost: Decimal,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default)]
    pub created_at: Option<DateTime>,
}
