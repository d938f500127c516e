//! Shipping
//!
//! Shipping is charged per parcel, where a parcel holds up to [`UNITS_PER_PARCEL`] units
//! regardless of which products they are.

use std::num::NonZeroU32;

use rust_decimal::Decimal;

use crate::pricing::{Eur, eur};

/// Units that fit in one parcel.
pub const UNITS_PER_PARCEL: u32 = 3;

/// Charge per parcel, in euro cents.
pub const UNIT_SHIPPING_CENTS: i64 = 890;

/// Banded shipping policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShippingPolicy {
    unit_price: Decimal,
    units_per_parcel: NonZeroU32,
}

impl ShippingPolicy {
    /// Create a policy charging `unit_price` per `units_per_parcel` units.
    pub fn new(unit_price: Decimal, units_per_parcel: NonZeroU32) -> Self {
        Self {
            unit_price,
            units_per_parcel,
        }
    }

    /// Charge per parcel.
    pub fn unit_price(&self) -> Decimal {
        self.unit_price
    }

    /// Number of parcels needed for `total_quantity` units.
    pub fn parcels(&self, total_quantity: u32) -> u32 {
        total_quantity.div_ceil(self.units_per_parcel.get())
    }

    /// Shipping charge for `total_quantity` units. Zero units ship for free.
    pub fn cost(&self, total_quantity: u32) -> Eur {
        eur(self.unit_price * Decimal::from(self.parcels(total_quantity)))
    }
}

impl Default for ShippingPolicy {
    fn default() -> Self {
        Self {
            unit_price: Decimal::new(UNIT_SHIPPING_CENTS, 2),
            units_per_parcel: NonZeroU32::MIN.saturating_add(UNITS_PER_PARCEL - 1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cost(quantity: u32) -> Decimal {
        *ShippingPolicy::default().cost(quantity).amount()
    }

    #[test]
    fn nothing_to_ship_is_free() {
        assert_eq!(cost(0), Decimal::ZERO);
    }

    #[test]
    fn charges_one_unit_per_three_items() {
        let unit = Decimal::new(890, 2);

        for quantity in 1..=3 {
            assert_eq!(cost(quantity), unit, "quantity {quantity}");
        }

        for quantity in 4..=6 {
            assert_eq!(cost(quantity), unit * Decimal::TWO, "quantity {quantity}");
        }

        for quantity in 7..=9 {
            assert_eq!(cost(quantity), unit * Decimal::from(3), "quantity {quantity}");
        }
    }

    #[test]
    fn cost_never_decreases_with_quantity() {
        let costs: Vec<Decimal> = (0..=30).map(cost).collect();

        assert!(
            costs.windows(2).all(|pair| pair.first() <= pair.last()),
            "shipping must be monotonic: {costs:?}"
        );
    }

    #[test]
    fn custom_policy() {
        let policy = ShippingPolicy::new(Decimal::from(5), NonZeroU32::MIN);

        assert_eq!(policy.parcels(4), 4);
        assert_eq!(*policy.cost(4).amount(), Decimal::from(20));
        assert_eq!(policy.unit_price(), Decimal::from(5));
    }
}
