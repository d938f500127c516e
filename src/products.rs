//! Products

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Product as served by the catalog API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Product identifier
    pub id: String,

    /// Product name
    pub name: String,

    /// Catalog category
    #[serde(default)]
    pub category: String,

    /// Unit price in EUR
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,

    /// Image URL
    #[serde(default)]
    pub image: String,

    /// Short description
    #[serde(default)]
    pub description: String,

    /// Whether the product can currently be ordered
    #[serde(default = "in_stock_by_default")]
    pub in_stock: bool,

    /// Whether the product is highlighted on the home page
    #[serde(default)]
    pub featured: bool,
}

fn in_stock_by_default() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn deserializes_catalog_payload() -> TestResult {
        let product: Product = serde_json::from_str(
            r#"{
                "id": "p-1",
                "name": "Tisana Depurativa",
                "category": "tisane",
                "price": 12.5,
                "image": "https://example.com/tisana.jpg",
                "description": "Mix di erbe",
                "featured": true,
                "createdAt": "2025-01-01T10:00:00"
            }"#,
        )?;

        assert_eq!(product.id, "p-1");
        assert_eq!(product.price, Decimal::new(1250, 2));
        assert!(product.in_stock, "inStock should default to true");
        assert!(product.featured);

        Ok(())
    }

    #[test]
    fn out_of_stock_flag_is_read() -> TestResult {
        let product: Product = serde_json::from_str(
            r#"{"id": "p-2", "name": "Omega 3", "price": 20, "inStock": false}"#,
        )?;

        assert!(!product.in_stock);
        assert_eq!(product.price, Decimal::from(20));

        Ok(())
    }
}
