//! Catalog records: products and categories.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use santafe_core::{CartError, CartLine, CategoryId, Price, ProductId};

/// A product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Categoria {
    pub id: CategoryId,
    pub nome: String,
    #[serde(default)]
    pub descricao: Option<String>,
}

/// A product as listed by `GET /produtos`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Produto {
    pub id: ProductId,
    pub nome: String,
    /// Unit price; accepted as a JSON number or string.
    pub preco: Decimal,
    #[serde(default)]
    pub descricao: Option<String>,
    /// Image URL.
    #[serde(default)]
    pub imagem: Option<String>,
    /// Units in stock, when the backend reports it.
    #[serde(default)]
    pub estoque: Option<i64>,
    #[serde(default)]
    pub categoria: Option<Categoria>,
}

impl Produto {
    /// Whether the product belongs to `categoria_id`.
    #[must_use]
    pub fn in_categoria(&self, categoria_id: &CategoryId) -> bool {
        self.categoria.as_ref().is_some_and(|c| &c.id == categoria_id)
    }

    #[must_use]
    pub const fn price(&self) -> Price {
        Price::brl(self.preco)
    }

    /// Build a cart line for `quantity` units of this product.
    ///
    /// # Errors
    ///
    /// Propagates [`CartError`] for a zero quantity or a negative price.
    pub fn to_cart_line(&self, quantity: u32) -> Result<CartLine, CartError> {
        let line = CartLine::new(self.id, self.nome.clone(), self.preco, quantity)?;
        Ok(match &self.imagem {
            Some(image) => line.with_image(image.clone()),
            None => line,
        })
    }
}
