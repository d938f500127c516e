//! Nutricart prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{CART_STORAGE_KEY, CartStore, items::CartItem},
    checkout::{
        CheckoutEntry, CheckoutError, CheckoutForm, CheckoutPhase, CheckoutSession, FormField,
        PaymentCapture, PaymentMethod, PaymentRequest, PaymentStatus, ProviderOrderId,
        session::{CART_PATH, COMPLETION_REDIRECT_DELAY, COMPLETION_REDIRECT_PATH},
    },
    orders::{Customer, NewOrder, Order, OrderItem, OrderStatus, ShippingAddress},
    pricing::{Eur, Quote, eur, format_eur},
    products::Product,
    shipping::ShippingPolicy,
    storage::{CartStorage, FileStorage, MemoryStorage, StorageError},
};
