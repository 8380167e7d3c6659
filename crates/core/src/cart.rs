//! Client-side shopping cart.
//!
//! The cart lives entirely in memory for the duration of a session. It keeps
//! at most one line per product, in insertion order, and every line always
//! has a quantity of at least one.
//!
//! # Policies
//!
//! - [`Cart::add_item`] merges by product: adding a product that is already in
//!   the cart increases the existing line's quantity. The existing line's name
//!   and unit price are kept.
//! - [`Cart::update_quantity`] with `0` removes the line.
//! - [`Cart::adjust_quantity`] (the +/- buttons) refuses to go below one.
//! - Unit prices are capped at [`MAX_UNIT_PRICE`] and quantities at
//!   [`MAX_QUANTITY`]; changes past the quantity cap are rejected.
//!
//! All operations are total: unknown product IDs are no-ops, never errors,
//! and totals never overflow.

use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

use crate::types::{CurrencyCode, Price, ProductId};

/// Largest quantity a single line may hold.
pub const MAX_QUANTITY: u32 = 100_000;

/// Largest accepted unit price (one billion).
pub const MAX_UNIT_PRICE: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

/// Errors raised when building a [`CartLine`] from untrusted input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    /// Unit prices cannot be negative.
    #[error("product {product_id} has a negative unit price ({price})")]
    NegativePrice {
        /// Offending product.
        product_id: ProductId,
        /// The rejected price.
        price: Decimal,
    },

    /// A line must hold at least one unit.
    #[error("product {product_id} must have a quantity of at least 1")]
    ZeroQuantity {
        /// Offending product.
        product_id: ProductId,
    },

    /// Unit price above [`MAX_UNIT_PRICE`].
    #[error("product {product_id} has a unit price above the limit ({price})")]
    PriceTooHigh {
        /// Offending product.
        product_id: ProductId,
        /// The rejected price.
        price: Decimal,
    },

    /// Quantity above [`MAX_QUANTITY`].
    #[error("product {product_id} has a quantity above the limit ({quantity})")]
    QuantityTooLarge {
        /// Offending product.
        product_id: ProductId,
        /// The rejected quantity.
        quantity: u32,
    },
}

/// One product in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartLine {
    product_id: ProductId,
    name: String,
    unit_price: Decimal,
    quantity: u32,
    image_ref: Option<String>,
}

impl CartLine {
    /// Create a validated cart line.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::NegativePrice`] for a negative price,
    /// [`CartError::ZeroQuantity`] for a zero quantity, and
    /// [`CartError::PriceTooHigh`] or [`CartError::QuantityTooLarge`] past
    /// the caps.
    pub fn new(
        product_id: ProductId,
        name: impl Into<String>,
        unit_price: Decimal,
        quantity: u32,
    ) -> Result<Self, CartError> {
        if unit_price.is_sign_negative() && !unit_price.is_zero() {
            return Err(CartError::NegativePrice {
                product_id,
                price: unit_price,
            });
        }
        if unit_price > MAX_UNIT_PRICE {
            return Err(CartError::PriceTooHigh {
                product_id,
                price: unit_price,
            });
        }
        if quantity == 0 {
            return Err(CartError::ZeroQuantity { product_id });
        }
        if quantity > MAX_QUANTITY {
            return Err(CartError::QuantityTooLarge {
                product_id,
                quantity,
            });
        }

        Ok(Self {
            product_id,
            name: name.into(),
            unit_price,
            quantity,
            image_ref: None,
        })
    }

    /// Attach an image reference (URL or asset name).
    #[must_use]
    pub fn with_image(mut self, image_ref: impl Into<String>) -> Self {
        self.image_ref = Some(image_ref.into());
        self
    }

    #[must_use]
    pub const fn product_id(&self) -> ProductId {
        self.product_id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn unit_price(&self) -> Decimal {
        self.unit_price
    }

    #[must_use]
    pub const fn quantity(&self) -> u32 {
        self.quantity
    }

    #[must_use]
    pub fn image_ref(&self) -> Option<&str> {
        self.image_ref.as_deref()
    }

    /// `unit_price × quantity`, exact within the caps.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price
            .checked_mul(Decimal::from(self.quantity))
            .unwrap_or(Decimal::MAX)
    }
}

/// What a cart mutation did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityChange {
    /// A new line was appended.
    Added,
    /// The product was already present; its quantity is now `quantity`.
    Merged { quantity: u32 },
    /// The line's quantity is now `quantity`.
    Updated { quantity: u32 },
    /// The line was removed.
    Removed,
    /// The requested quantity equals the current one.
    Unchanged,
    /// The change would leave the quantity below one or above
    /// [`MAX_QUANTITY`] and was ignored.
    Rejected,
    /// No line exists for the product.
    NotInCart,
}

/// Totals shown on the cart screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartSummary {
    /// Number of distinct products.
    pub line_count: usize,
    /// Sum of all quantities.
    pub total_items: u64,
    /// Sum of all line totals.
    pub subtotal: Price,
    /// Taxes and fees (the store currently charges none).
    pub taxes: Price,
    /// `subtotal + taxes`.
    pub total: Price,
}

/// The session's shopping cart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Cart {
    lines: Vec<CartLine>,
    #[serde(skip)]
    currency: CurrencyCode,
}

impl Cart {
    /// Create an empty cart priced in the default currency.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a line, merging with an existing line for the same product.
    ///
    /// A merge that would exceed [`MAX_QUANTITY`] is rejected.
    pub fn add_item(&mut self, line: CartLine) -> QuantityChange {
        if let Some(existing) = self.line_mut(line.product_id) {
            let merged = existing.quantity.saturating_add(line.quantity);
            if merged > MAX_QUANTITY {
                return QuantityChange::Rejected;
            }
            existing.quantity = merged;
            return QuantityChange::Merged { quantity: merged };
        }

        self.lines.push(line);
        QuantityChange::Added
    }

    /// Set the quantity of a product's line. `0` removes the line; values
    /// above [`MAX_QUANTITY`] are rejected.
    pub fn update_quantity(&mut self, product_id: ProductId, quantity: u32) -> QuantityChange {
        if quantity == 0 {
            return if self.remove_item(product_id).is_some() {
                QuantityChange::Removed
            } else {
                QuantityChange::NotInCart
            };
        }

        let Some(line) = self.line_mut(product_id) else {
            return QuantityChange::NotInCart;
        };

        if quantity > MAX_QUANTITY {
            return QuantityChange::Rejected;
        }
        if line.quantity == quantity {
            return QuantityChange::Unchanged;
        }
        line.quantity = quantity;
        QuantityChange::Updated { quantity }
    }

    /// Apply a signed delta to a line's quantity.
    ///
    /// A result below one or above [`MAX_QUANTITY`] is rejected and leaves the line untouched; use
    /// [`Cart::remove_item`] to drop a product.
    pub fn adjust_quantity(&mut self, product_id: ProductId, delta: i64) -> QuantityChange {
        let Some(line) = self.line_mut(product_id) else {
            return QuantityChange::NotInCart;
        };

        if delta == 0 {
            return QuantityChange::Unchanged;
        }

        let next = i64::from(line.quantity).saturating_add(delta);
        let Some(next) = u32::try_from(next)
            .ok()
            .filter(|q| (1..=MAX_QUANTITY).contains(q))
        else {
            return QuantityChange::Rejected;
        };

        line.quantity = next;
        QuantityChange::Updated { quantity: next }
    }

    /// Remove a product's line, returning it if it was present.
    pub fn remove_item(&mut self, product_id: ProductId) -> Option<CartLine> {
        let index = self
            .lines
            .iter()
            .position(|line| line.product_id == product_id)?;
        Some(self.lines.remove(index))
    }

    /// Drop every line.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Sum of quantities across all lines.
    #[must_use]
    pub fn total_items(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }

    /// Exact sum of `unit_price × quantity` across all lines.
    #[must_use]
    pub fn total_price(&self) -> Decimal {
        self.lines
            .iter()
            .map(CartLine::line_total)
            .fold(Decimal::ZERO, Decimal::saturating_add)
    }

    /// Totals for display.
    #[must_use]
    pub fn summary(&self) -> CartSummary {
        let subtotal = Price::new(self.total_price(), self.currency);
        let taxes = Price::zero(self.currency);

        CartSummary {
            line_count: self.lines.len(),
            total_items: self.total_items(),
            subtotal,
            taxes,
            total: Price::new(subtotal.amount.saturating_add(taxes.amount), self.currency),
        }
    }

    #[must_use]
    pub fn contains(&self, product_id: ProductId) -> bool {
        self.get(product_id).is_some()
    }

    #[must_use]
    pub fn get(&self, product_id: ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.product_id == product_id)
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    fn line_mut(&mut self, product_id: ProductId) -> Option<&mut CartLine> {
        self.lines
            .iter_mut()
            .find(|line| line.product_id == product_id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::str::FromStr;

    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn line(id: i64, price: &str, quantity: u32) -> CartLine {
        CartLine::new(ProductId::new(id), format!("Produto {id}"), dec(price), quantity).unwrap()
    }

    #[test]
    fn test_new_cart_is_empty() {
        let cart = Cart::new();
        assert!(cart.is_empty());
        assert_eq!(cart.total_items(), 0);
        assert_eq!(cart.total_price(), Decimal::ZERO);
    }

    #[test]
    fn test_line_rejects_negative_price() {
        let err = CartLine::new(ProductId::new(1), "x", dec("-0.01"), 1).unwrap_err();
        assert!(matches!(err, CartError::NegativePrice { .. }));
    }

    #[test]
    fn test_line_rejects_zero_quantity() {
        let err = CartLine::new(ProductId::new(1), "x", dec("1.00"), 0).unwrap_err();
        assert_eq!(
            err,
            CartError::ZeroQuantity {
                product_id: ProductId::new(1)
            }
        );
    }

    #[test]
    fn test_line_allows_free_items() {
        assert!(CartLine::new(ProductId::new(1), "brinde", Decimal::ZERO, 1).is_ok());
    }

    #[test]
    fn test_add_then_total() {
        let mut cart = Cart::new();
        assert_eq!(cart.add_item(line(101, "24.99", 1)), QuantityChange::Added);
        assert_eq!(cart.total_price(), dec("24.99"));
        assert_eq!(cart.total_items(), 1);
    }

    #[test]
    fn test_add_same_product_merges() {
        let mut cart = Cart::new();
        cart.add_item(line(101, "24.99", 1));
        assert_eq!(
            cart.add_item(line(101, "24.99", 1)),
            QuantityChange::Merged { quantity: 2 }
        );
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.total_items(), 2);
        assert_eq!(cart.total_price(), dec("49.98"));
    }

    #[test]
    fn test_merge_keeps_existing_price() {
        let mut cart = Cart::new();
        cart.add_item(line(7, "10.00", 1));
        cart.add_item(line(7, "99.00", 2));
        let merged = cart.get(ProductId::new(7)).unwrap();
        assert_eq!(merged.unit_price(), dec("10.00"));
        assert_eq!(merged.quantity(), 3);
    }

    #[test]
    fn test_insertion_order_is_kept() {
        let mut cart = Cart::new();
        cart.add_item(line(3, "1", 1));
        cart.add_item(line(1, "1", 1));
        cart.add_item(line(2, "1", 1));
        cart.add_item(line(1, "1", 1));
        let ids: Vec<i64> = cart.lines().iter().map(|l| l.product_id().as_i64()).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn test_no_drift_after_many_increments() {
        let mut cart = Cart::new();
        for _ in 0..1000 {
            cart.add_item(line(1, "0.1", 1));
        }
        assert_eq!(cart.total_price(), dec("100"));

        let mut spread = Cart::new();
        for id in 0..1000 {
            spread.add_item(line(id, "0.1", 1));
        }
        assert_eq!(spread.total_price(), dec("100.0"));
        assert_eq!(spread.total_items(), 1000);
    }

    #[test]
    fn test_update_quantity_is_idempotent() {
        let mut cart = Cart::new();
        cart.add_item(line(1, "8.99", 1));
        cart.add_item(line(2, "4.99", 3));

        assert_eq!(
            cart.update_quantity(ProductId::new(1), 5),
            QuantityChange::Updated { quantity: 5 }
        );
        let once = cart.clone();
        assert_eq!(
            cart.update_quantity(ProductId::new(1), 5),
            QuantityChange::Unchanged
        );
        assert_eq!(cart, once);
        assert_eq!(cart.total_price(), dec("59.92"));
    }

    #[test]
    fn test_update_quantity_zero_removes() {
        let mut cart = Cart::new();
        cart.add_item(line(1, "8.99", 2));
        assert_eq!(
            cart.update_quantity(ProductId::new(1), 0),
            QuantityChange::Removed
        );
        assert!(cart.is_empty());
        assert_eq!(
            cart.update_quantity(ProductId::new(1), 0),
            QuantityChange::NotInCart
        );
    }

    #[test]
    fn test_update_unknown_product_is_noop() {
        let mut cart = Cart::new();
        cart.add_item(line(1, "8.99", 2));
        assert_eq!(
            cart.update_quantity(ProductId::new(99), 3),
            QuantityChange::NotInCart
        );
        assert_eq!(cart.total_items(), 2);
    }

    #[test]
    fn test_adjust_quantity_never_drops_below_one() {
        let mut cart = Cart::new();
        cart.add_item(line(1, "15.99", 1));

        assert_eq!(
            cart.adjust_quantity(ProductId::new(1), -1),
            QuantityChange::Rejected
        );
        assert_eq!(cart.get(ProductId::new(1)).unwrap().quantity(), 1);

        assert_eq!(
            cart.adjust_quantity(ProductId::new(1), 2),
            QuantityChange::Updated { quantity: 3 }
        );
        assert_eq!(
            cart.adjust_quantity(ProductId::new(1), -2),
            QuantityChange::Updated { quantity: 1 }
        );
    }

    #[test]
    fn test_remove_item() {
        let mut cart = Cart::new();
        cart.add_item(line(1, "1.50", 2));
        cart.add_item(line(2, "2.00", 1));

        let removed = cart.remove_item(ProductId::new(1)).unwrap();
        assert_eq!(removed.quantity(), 2);
        assert!(cart.remove_item(ProductId::new(1)).is_none());
        assert_eq!(cart.total_price(), dec("2.00"));
    }

    #[test]
    fn test_totals_track_mixed_operations() {
        let mut cart = Cart::new();
        cart.add_item(line(101, "24.99", 1));
        cart.add_item(line(102, "8.99", 2));
        cart.add_item(line(103, "4.99", 1));
        cart.adjust_quantity(ProductId::new(101), 1);
        cart.update_quantity(ProductId::new(102), 4);
        cart.remove_item(ProductId::new(103));

        let expected: Decimal = cart.lines().iter().map(CartLine::line_total).sum();
        let quantities: u64 = cart.lines().iter().map(|l| u64::from(l.quantity())).sum();
        assert_eq!(cart.total_price(), expected);
        assert_eq!(cart.total_price(), dec("85.94"));
        assert_eq!(cart.total_items(), quantities);
    }

    #[test]
    fn test_summary() {
        let mut cart = Cart::new();
        cart.add_item(line(101, "24.99", 2));
        cart.add_item(line(104, "15.99", 1));

        let summary = cart.summary();
        assert_eq!(summary.line_count, 2);
        assert_eq!(summary.total_items, 3);
        assert_eq!(summary.subtotal.display(), "R$ 65.97");
        assert_eq!(summary.taxes.display(), "R$ 0.00");
        assert_eq!(summary.total, summary.subtotal);
    }

    #[test]
    fn test_clear() {
        let mut cart = Cart::new();
        cart.add_item(line(1, "1", 1));
        cart.clear();
        assert!(cart.is_empty());
        assert!(!cart.contains(ProductId::new(1)));
    }

    #[test]
    fn test_line_rejects_values_past_the_caps() {
        let huge = dec("100000000000000000000");
        assert!(matches!(
            CartLine::new(ProductId::new(1), "x", huge, 1),
            Err(CartError::PriceTooHigh { .. })
        ));
        assert!(matches!(
            CartLine::new(ProductId::new(1), "x", dec("1"), u32::MAX),
            Err(CartError::QuantityTooLarge { .. })
        ));
        assert!(CartLine::new(ProductId::new(1), "x", MAX_UNIT_PRICE, MAX_QUANTITY).is_ok());
    }

    #[test]
    fn test_quantity_cap_holds_for_every_mutation() {
        let mut cart = Cart::new();
        cart.add_item(line(1, "1000000000", MAX_QUANTITY));

        assert_eq!(cart.add_item(line(1, "1", 1)), QuantityChange::Rejected);
        assert_eq!(
            cart.adjust_quantity(ProductId::new(1), 1),
            QuantityChange::Rejected
        );
        assert_eq!(
            cart.adjust_quantity(ProductId::new(1), i64::MAX),
            QuantityChange::Rejected
        );
        assert_eq!(
            cart.update_quantity(ProductId::new(1), MAX_QUANTITY + 1),
            QuantityChange::Rejected
        );
        assert_eq!(cart.total_items(), u64::from(MAX_QUANTITY));
    }

    #[test]
    fn test_totals_at_the_caps_do_not_overflow() {
        let mut cart = Cart::new();
        for id in 0..1000 {
            cart.add_item(line(id, "1000000000", MAX_QUANTITY));
        }
        assert_eq!(cart.total_price(), dec("100000000000000000"));
        assert_eq!(cart.summary().total.amount, cart.total_price());
    }
}
