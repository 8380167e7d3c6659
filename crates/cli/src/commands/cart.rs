//! Offline cart pricing.
//!
//! # Usage
//!
//! ```bash
//! santafe cart --line 101:24.99:2 --line 101:24.99:1 --line 104:15.99:1
//! ```
//!
//! Lines for the same product are merged, keeping the first line's price.

use std::str::FromStr;

use rust_decimal::Decimal;
use thiserror::Error;

use santafe_client::{AppError, AppState};
use santafe_core::{CartLine, ProductId};

/// Errors that can occur parsing a `--line` argument.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LineSpecError {
    /// Not three colon-separated parts.
    #[error("expected product_id:unit_price:quantity, got {0:?}")]
    Shape(String),

    /// Product ID is not an integer.
    #[error("invalid product id: {0}")]
    ProductId(String),

    /// Price is not a decimal number.
    #[error("invalid price: {0}")]
    Price(String),

    /// Quantity is not a non-negative integer.
    #[error("invalid quantity: {0}")]
    Quantity(String),
}

/// One `--line` argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineSpec {
    pub product_id: ProductId,
    pub unit_price: Decimal,
    pub quantity: u32,
}

impl FromStr for LineSpec {
    type Err = LineSpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split(':');
        let (Some(id), Some(price), Some(quantity), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(LineSpecError::Shape(s.to_string()));
        };

        Ok(Self {
            product_id: id
                .trim()
                .parse::<i64>()
                .map(ProductId::new)
                .map_err(|_| LineSpecError::ProductId(id.to_string()))?,
            unit_price: Decimal::from_str(price.trim())
                .map_err(|_| LineSpecError::Price(price.to_string()))?,
            quantity: quantity
                .trim()
                .parse()
                .map_err(|_| LineSpecError::Quantity(quantity.to_string()))?,
        })
    }
}

/// Add every line to the session cart and print the totals.
///
/// # Errors
///
/// Returns an error for a zero quantity, a negative price, or a value past
/// the cart limits.
#[allow(clippy::print_stdout)]
pub async fn summarize(state: &AppState, lines: Vec<LineSpec>) -> Result<(), AppError> {
    let cart = state.cart();

    for spec in lines {
        let line = CartLine::new(
            spec.product_id,
            format!("Produto {}", spec.product_id),
            spec.unit_price,
            spec.quantity,
        )?;
        cart.add_line(line).await;
    }

    let snapshot = cart.snapshot().await;
    let summary = cart.summary().await;

    for line in snapshot.lines() {
        println!(
            "{:>8}  {:>3} x {:>10}  = {}",
            line.product_id().to_string(),
            line.quantity(),
            line.unit_price(),
            line.line_total()
        );
    }
    println!("Itens:    {}", summary.total_items);
    println!("Subtotal: {}", summary.subtotal);
    println!("Total:    {}", summary.total);

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_line() {
        let spec: LineSpec = "101:24.99:2".parse().unwrap();
        assert_eq!(spec.product_id, ProductId::new(101));
        assert_eq!(spec.unit_price, Decimal::new(2499, 2));
        assert_eq!(spec.quantity, 2);
    }

    #[test]
    fn test_parse_line_errors() {
        assert!(matches!(
            "101:24.99".parse::<LineSpec>(),
            Err(LineSpecError::Shape(_))
        ));
        assert!(matches!(
            "101:24.99:2:9".parse::<LineSpec>(),
            Err(LineSpecError::Shape(_))
        ));
        assert!(matches!(
            "abc:24.99:2".parse::<LineSpec>(),
            Err(LineSpecError::ProductId(_))
        ));
        assert!(matches!(
            "101:R$24:2".parse::<LineSpec>(),
            Err(LineSpecError::Price(_))
        ));
        assert!(matches!(
            "101:24.99:-1".parse::<LineSpec>(),
            Err(LineSpecError::Quantity(_))
        ));
    }

    #[tokio::test]
    async fn test_oversized_line_is_an_error() {
        use santafe_client::ClientConfig;
        use santafe_client::storage::SessionStore;
        use santafe_core::CartError;

        let state =
            AppState::with_session(ClientConfig::default(), SessionStore::in_memory()).unwrap();
        let spec: LineSpec = "1:100000000000000000000:4294967295".parse().unwrap();

        let err = summarize(&state, vec![spec]).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::Cart(CartError::PriceTooHigh { .. })
        ));
        assert!(state.cart().snapshot().await.is_empty());
    }
}
