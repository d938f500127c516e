//! Cart
//!
//! The [`CartStore`] is the single source of truth for what the shopper is about to buy. Every
//! mutation is written through to a [`CartStorage`] backend. When a write fails the store logs
//! a warning and keeps working in memory for the rest of the session.

use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::{
    orders::OrderItem,
    pricing::{self, Eur},
    products::Product,
    storage::{CartStorage, MemoryStorage, StorageError},
};

pub mod items;

use items::CartItem;

/// Key the cart is persisted under.
pub const CART_STORAGE_KEY: &str = "cart";

/// Shopping cart state container.
#[derive(Debug)]
pub struct CartStore {
    items: Vec<CartItem>,
    storage: Option<Box<dyn CartStorage>>,
}

impl CartStore {
    /// Create an empty cart backed by process memory only.
    pub fn in_memory() -> Self {
        Self {
            items: Vec::new(),
            storage: Some(Box::new(MemoryStorage::new())),
        }
    }

    /// Rehydrate the cart from `storage`.
    ///
    /// Unreadable or corrupt contents start an empty cart; the next mutation overwrites them.
    pub fn load(storage: Box<dyn CartStorage>) -> Self {
        let items = match read_items(storage.as_ref()) {
            Ok(items) => items,
            Err(error) => {
                warn!("discarding unreadable stored cart: {error}");

                Vec::new()
            }
        };

        debug!(lines = items.len(), "cart rehydrated");

        Self {
            items: normalise(items),
            storage: Some(storage),
        }
    }

    /// Add one unit of `product`, merging with an existing line for the same id.
    pub fn add_item(&mut self, product: &Product) {
        match self.items.iter_mut().find(|item| item.id == product.id) {
            Some(item) => item.quantity = item.quantity.saturating_add(1),
            None => self.items.push(CartItem::from_product(product)),
        }

        self.persist();
    }

    /// Remove the line for `id`. Unknown ids are ignored.
    pub fn remove_item(&mut self, id: &str) {
        let before = self.items.len();

        self.items.retain(|item| item.id != id);

        if self.items.len() != before {
            self.persist();
        }
    }

    /// Set the quantity for `id`. Anything below 1 removes the line.
    pub fn update_quantity(&mut self, id: &str, quantity: i64) {
        let quantity = quantity.max(0);

        if quantity == 0 {
            self.remove_item(id);
            return;
        }

        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);

        if let Some(item) = self.items.iter_mut().find(|item| item.id == id) {
            item.quantity = quantity;
            self.persist();
        }
    }

    /// Add one unit to an existing line.
    pub fn increment(&mut self, id: &str) {
        if let Some(quantity) = self.get(id).map(|item| i64::from(item.quantity)) {
            self.update_quantity(id, quantity + 1);
        }
    }

    /// Take one unit off an existing line, removing it at zero.
    pub fn decrement(&mut self, id: &str) {
        if let Some(quantity) = self.get(id).map(|item| i64::from(item.quantity)) {
            self.update_quantity(id, quantity - 1);
        }
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.items.clear();
        self.persist();
    }

    /// Take the quantities of a placed order off the cart.
    ///
    /// Lines added after the order was snapshotted stay; with no concurrent edits the cart ends
    /// up empty.
    pub fn remove_ordered(&mut self, ordered: &[OrderItem]) {
        for line in ordered {
            if let Some(item) = self.items.iter_mut().find(|item| item.id == line.product_id) {
                item.quantity = item.quantity.saturating_sub(line.quantity);
            }
        }

        self.items.retain(|item| item.quantity > 0);
        self.persist();
    }

    /// Lines in order of first addition.
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Look up the line for `id`.
    pub fn get(&self, id: &str) -> Option<&CartItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Sum of `price × quantity`, computed on every call.
    pub fn total(&self) -> Eur {
        pricing::subtotal(&self.items)
    }

    /// Total number of units, used for the cart badge.
    pub fn count(&self) -> u32 {
        pricing::total_quantity(&self.items)
    }

    /// Number of distinct products.
    pub fn line_count(&self) -> usize {
        self.items.len()
    }

    /// `price × quantity` for the line matching `id`.
    pub fn line_total(&self, id: &str) -> Option<Decimal> {
        self.get(id).map(CartItem::line_total)
    }

    /// Whether the cart holds no lines.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether mutations are still being written to durable storage.
    pub fn is_persistent(&self) -> bool {
        self.storage.is_some()
    }

    fn persist(&mut self) {
        let Some(storage) = self.storage.as_mut() else {
            return;
        };

        if let Err(error) = write_items(storage.as_mut(), &self.items) {
            warn!("cart persistence failed, continuing in memory: {error}");

            self.storage = None;
        }
    }
}

impl Default for CartStore {
    fn default() -> Self {
        Self::in_memory()
    }
}

fn read_items(storage: &dyn CartStorage) -> Result<Vec<CartItem>, StorageError> {
    match storage.read(CART_STORAGE_KEY)? {
        Some(json) => Ok(serde_json::from_str(&json)?),
        None => Ok(Vec::new()),
    }
}

fn write_items(storage: &mut dyn CartStorage, items: &[CartItem]) -> Result<(), StorageError> {
    let json = serde_json::to_string(items)?;

    storage.write(CART_STORAGE_KEY, &json)
}

/// Restore the cart invariants on data read from outside: one line per id, no empty lines.
fn normalise(items: Vec<CartItem>) -> Vec<CartItem> {
    let mut merged: Vec<CartItem> = Vec::with_capacity(items.len());

    for item in items.into_iter().filter(|item| item.quantity > 0) {
        match merged.iter_mut().find(|existing| existing.id == item.id) {
            Some(existing) => existing.quantity = existing.quantity.saturating_add(item.quantity),
            None => merged.push(item),
        }
    }

    merged
}
