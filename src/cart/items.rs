//! Cart Items

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::products::Product;

/// A product line in the cart.
///
/// Name, image, description and price are copied from the product when it is first added and
/// are not refreshed afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    /// Product identifier, unique within a cart
    pub id: String,

    /// Product name
    pub name: String,

    /// Image URL
    #[serde(default)]
    pub image: String,

    /// Short description
    #[serde(default)]
    pub description: String,

    /// Unit price in EUR
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,

    /// Units of this product, always at least 1
    pub quantity: u32,
}

impl CartItem {
    /// Start a new line for `product` with a quantity of 1.
    pub fn from_product(product: &Product) -> Self {
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            image: product.image.clone(),
            description: product.description.clone(),
            price: product.price,
            quantity: 1,
        }
    }

    /// `price × quantity`, unrounded.
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

impl From<&Product> for CartItem {
    fn from(product: &Product) -> Self {
        Self::from_product(product)
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn copies_product_details() {
        let product = Product {
            id: "p-1".to_string(),
            name: "Omega 3".to_string(),
            category: "integratori".to_string(),
            price: Decimal::new(1990, 2),
            image: "omega.jpg".to_string(),
            description: "Capsule".to_string(),
            in_stock: true,
            featured: false,
        };

        let item = CartItem::from(&product);

        assert_eq!(item.id, product.id);
        assert_eq!(item.name, product.name);
        assert_eq!(item.image, product.image);
        assert_eq!(item.description, product.description);
        assert_eq!(item.price, product.price);
        assert_eq!(item.quantity, 1);
    }

    #[test]
    fn reads_persisted_float_prices() -> TestResult {
        let items: Vec<CartItem> = serde_json::from_str(
            r#"[{"id":"a","name":"A","image":"","description":"","price":10.5,"quantity":2}]"#,
        )?;

        let item = items.first().ok_or("missing item")?;

        assert_eq!(item.price, Decimal::new(105, 1));
        assert_eq!(item.line_total(), Decimal::from(21));

        Ok(())
    }
}
