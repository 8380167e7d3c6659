//! Cart operations over the shared cart.
//!
//! Thin wrapper around [`santafe_core::Cart`] that takes the lock, logs and
//! leaves a Sentry breadcrumb for every mutation.

use tokio::sync::Mutex;
use tracing::debug;

use santafe_core::{Cart, CartError, CartLine, CartSummary, ProductId, QuantityChange};

use crate::error::add_breadcrumb;
use crate::models::Produto;

/// Cart service.
pub struct CartService<'a> {
    cart: &'a Mutex<Cart>,
}

impl<'a> CartService<'a> {
    #[must_use]
    pub const fn new(cart: &'a Mutex<Cart>) -> Self {
        Self { cart }
    }

    /// Add `quantity` units of `produto`, merging with an existing line.
    ///
    /// # Errors
    ///
    /// Returns an error for a zero quantity or a negative price.
    pub async fn add_product(
        &self,
        produto: &Produto,
        quantity: u32,
    ) -> Result<QuantityChange, CartError> {
        let line = produto.to_cart_line(quantity)?;
        Ok(self.add_line(line).await)
    }

    /// Add a prepared line, merging with an existing line.
    pub async fn add_line(&self, line: CartLine) -> QuantityChange {
        let product_id = line.product_id().to_string();
        let quantity = line.quantity().to_string();
        let change = self.cart.lock().await.add_item(line);

        debug!(%product_id, ?change, "Cart item added");
        add_breadcrumb(
            "cart",
            "Added to cart",
            Some(&[("product_id", product_id.as_str()), ("quantity", quantity.as_str())]),
        );
        change
    }

    /// Set the quantity of a line; zero removes it.
    pub async fn update_quantity(&self, product_id: ProductId, quantity: u32) -> QuantityChange {
        let change = self.cart.lock().await.update_quantity(product_id, quantity);

        debug!(%product_id, ?change, "Cart quantity updated");
        add_breadcrumb(
            "cart",
            "Updated cart quantity",
            Some(&[
                ("product_id", product_id.to_string().as_str()),
                ("quantity", quantity.to_string().as_str()),
            ]),
        );
        change
    }

    /// Increment or decrement a line; results below one are rejected.
    pub async fn adjust_quantity(&self, product_id: ProductId, delta: i64) -> QuantityChange {
        let change = self.cart.lock().await.adjust_quantity(product_id, delta);

        debug!(%product_id, delta, ?change, "Cart quantity adjusted");
        add_breadcrumb(
            "cart",
            "Adjusted cart quantity",
            Some(&[
                ("product_id", product_id.to_string().as_str()),
                ("delta", delta.to_string().as_str()),
            ]),
        );
        change
    }

    /// Remove a line, returning it if it was present.
    pub async fn remove(&self, product_id: ProductId) -> Option<CartLine> {
        let removed = self.cart.lock().await.remove_item(product_id);

        debug!(%product_id, removed = removed.is_some(), "Cart item removed");
        add_breadcrumb(
            "cart",
            "Removed from cart",
            Some(&[("product_id", product_id.to_string().as_str())]),
        );
        removed
    }

    pub async fn clear(&self) {
        self.cart.lock().await.clear();
        add_breadcrumb("cart", "Cleared cart", None);
    }

    pub async fn summary(&self) -> CartSummary {
        self.cart.lock().await.summary()
    }

    /// A copy of the current cart.
    pub async fn snapshot(&self) -> Cart {
        self.cart.lock().await.clone()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    fn produto() -> Produto {
        serde_json::from_str(r#"{"id": 101, "nome": "Arroz Tipo 1 5kg", "preco": "24.99"}"#)
            .unwrap()
    }

    #[tokio::test]
    async fn test_add_merges_and_summarizes() {
        let cart = Mutex::new(Cart::new());
        let service = CartService::new(&cart);

        assert_eq!(
            service.add_product(&produto(), 1).await.unwrap(),
            QuantityChange::Added
        );
        assert!(matches!(
            service.add_product(&produto(), 2).await.unwrap(),
            QuantityChange::Merged { .. }
        ));

        let summary = service.summary().await;
        assert_eq!(summary.line_count, 1);
        assert_eq!(summary.total_items, 3);
        assert_eq!(summary.subtotal.amount, Decimal::new(7497, 2));
    }

    #[tokio::test]
    async fn test_zero_quantity_removes() {
        let cart = Mutex::new(Cart::new());
        let service = CartService::new(&cart);
        service.add_product(&produto(), 2).await.unwrap();

        assert_eq!(
            service.update_quantity(ProductId::new(101), 0).await,
            QuantityChange::Removed
        );
        assert!(service.snapshot().await.is_empty());
        assert!(service.remove(ProductId::new(101)).await.is_none());
    }

    #[tokio::test]
    async fn test_adjust_rejects_below_one() {
        let cart = Mutex::new(Cart::new());
        let service = CartService::new(&cart);
        service.add_product(&produto(), 1).await.unwrap();

        assert_eq!(
            service.adjust_quantity(ProductId::new(101), -1).await,
            QuantityChange::Rejected
        );
        assert_eq!(service.snapshot().await.total_items(), 1);
    }
}
