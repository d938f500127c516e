//! Pricing
//!
//! Money helpers and the checkout [`Quote`]. Amounts are kept at full precision and only rounded
//! to cents by the presentation helpers.

use rust_decimal::{Decimal, RoundingStrategy};
use rusty_money::{
    Money,
    iso::{self, Currency},
};

use crate::{cart::items::CartItem, shipping::ShippingPolicy};

/// An amount in euro.
pub type Eur = Money<'static, Currency>;

/// Wrap a decimal amount as euro.
pub fn eur(amount: Decimal) -> Eur {
    Money::from_decimal(amount, iso::EUR)
}

/// Sum of `price × quantity` over the given items.
pub fn subtotal(items: &[CartItem]) -> Eur {
    eur(items.iter().map(CartItem::line_total).sum())
}

/// Sum of quantities over the given items.
pub fn total_quantity(items: &[CartItem]) -> u32 {
    items
        .iter()
        .fold(0_u32, |acc, item| acc.saturating_add(item.quantity))
}

/// Round an amount to cents, half away from zero.
pub fn round_to_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Render an amount as a two-decimal string without symbol, e.g. `33.90`.
pub fn format_amount(money: &Eur) -> String {
    format!("{:.2}", round_to_cents(*money.amount()))
}

/// Render an amount for display, e.g. `€33.90`.
pub fn format_eur(money: &Eur) -> String {
    format!("€{}", format_amount(money))
}

/// Subtotal, shipping and grand total for a cart at a point in time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quote {
    total_quantity: u32,
    subtotal: Eur,
    shipping: Eur,
    total: Eur,
}

impl Quote {
    /// Compute the quote for the given items under a shipping policy.
    pub fn for_items(items: &[CartItem], policy: &ShippingPolicy) -> Self {
        let total_quantity = total_quantity(items);
        let subtotal = subtotal(items);
        let shipping = policy.cost(total_quantity);

        Quote {
            total_quantity,
            subtotal,
            shipping,
            total: eur(*subtotal.amount() + *shipping.amount()),
        }
    }

    /// Number of units across all lines.
    pub fn total_quantity(&self) -> u32 {
        self.total_quantity
    }

    /// Items subtotal.
    pub fn subtotal(&self) -> &Eur {
        &self.subtotal
    }

    /// Shipping charge.
    pub fn shipping(&self) -> &Eur {
        &self.shipping
    }

    /// Subtotal plus shipping.
    pub fn total(&self) -> &Eur {
        &self.total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, price: Decimal, quantity: u32) -> CartItem {
        CartItem {
            id: id.to_string(),
            name: id.to_uppercase(),
            image: String::new(),
            description: String::new(),
            price,
            quantity,
        }
    }

    #[test]
    fn subtotal_multiplies_price_by_quantity() {
        let items = [
            item("a", Decimal::new(1000, 2), 2),
            item("b", Decimal::new(500, 2), 1),
        ];

        assert_eq!(*subtotal(&items).amount(), Decimal::new(2500, 2));
    }

    #[test]
    fn subtotal_keeps_sub_cent_precision() {
        let items = [item("a", Decimal::new(3333, 3), 3)];

        assert_eq!(*subtotal(&items).amount(), Decimal::new(9999, 3));
        assert_eq!(format_amount(&subtotal(&items)), "10.00");
    }

    #[test]
    fn empty_items_have_zero_subtotal() {
        assert_eq!(*subtotal(&[]).amount(), Decimal::ZERO);
        assert_eq!(total_quantity(&[]), 0);
    }

    #[test]
    fn quote_adds_shipping_to_subtotal() {
        let items = [
            item("a", Decimal::new(1000, 2), 2),
            item("b", Decimal::new(500, 2), 1),
        ];

        let quote = Quote::for_items(&items, &ShippingPolicy::default());

        assert_eq!(quote.total_quantity(), 3);
        assert_eq!(*quote.subtotal().amount(), Decimal::new(2500, 2));
        assert_eq!(*quote.shipping().amount(), Decimal::new(890, 2));
        assert_eq!(*quote.total().amount(), Decimal::new(3390, 2));
    }

    #[test]
    fn format_eur_pads_to_two_decimals() {
        assert_eq!(format_eur(&eur(Decimal::from(25))), "€25.00");
        assert_eq!(format_eur(&eur(Decimal::new(3395, 3))), "€3.40");
    }
}
