//! Cache types for catalog responses.

use std::sync::Arc;

use crate::models::{Categoria, Produto};

/// Cache key for catalog reads.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum CacheKey {
    Produtos,
    Categorias,
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Produtos(Arc<[Produto]>),
    Categorias(Arc<[Categoria]>),
}
