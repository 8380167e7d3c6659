//! Catalog endpoints: products and categories, cached for five minutes.

use std::sync::Arc;

use reqwest::Method;
use tracing::{debug, instrument};

use santafe_core::CategoryId;

use crate::endpoint::PROBE_PATH;
use crate::models::{Categoria, Produto};

use super::cache::{CacheKey, CacheValue};
use super::types::{CategoriasEnvelope, ProdutosEnvelope};
use super::{ApiClient, ApiError, ApiResponse};

impl ApiClient {
    /// List all products.
    ///
    /// Successful responses are cached; failures never are.
    ///
    /// # Errors
    ///
    /// Returns an error if no backend could be reached or the body is malformed.
    #[instrument(skip(self))]
    pub async fn produtos(&self) -> Result<ApiResponse<Arc<[Produto]>>, ApiError> {
        if let Some(CacheValue::Produtos(produtos)) = self.inner.cache.get(&CacheKey::Produtos).await {
            debug!("Cache hit for produtos");
            return Ok(ApiResponse::Success {
                data: produtos,
                message: None,
            });
        }

        let response = self
            .call::<ProdutosEnvelope, ()>(Method::GET, "/produtos", None)
            .await?
            .map(Arc::<[Produto]>::from);

        if let ApiResponse::Success { data, .. } = &response {
            self.inner
                .cache
                .insert(CacheKey::Produtos, CacheValue::Produtos(Arc::clone(data)))
                .await;
        }

        Ok(response)
    }

    /// List the products of one category, filtered client-side.
    ///
    /// # Errors
    ///
    /// Returns an error if no backend could be reached or the body is malformed.
    #[instrument(skip(self, categoria_id), fields(categoria_id = %categoria_id))]
    pub async fn produtos_by_categoria(
        &self,
        categoria_id: &CategoryId,
    ) -> Result<ApiResponse<Vec<Produto>>, ApiError> {
        let response = self.produtos().await?;
        Ok(response.map(|produtos| {
            produtos
                .iter()
                .filter(|p| p.in_categoria(categoria_id))
                .cloned()
                .collect()
        }))
    }

    /// List all categories.
    ///
    /// # Errors
    ///
    /// Returns an error if no backend could be reached or the body is malformed.
    #[instrument(skip(self))]
    pub async fn categorias(&self) -> Result<ApiResponse<Arc<[Categoria]>>, ApiError> {
        if let Some(CacheValue::Categorias(categorias)) =
            self.inner.cache.get(&CacheKey::Categorias).await
        {
            debug!("Cache hit for categorias");
            return Ok(ApiResponse::Success {
                data: categorias,
                message: None,
            });
        }

        let response = self
            .call::<CategoriasEnvelope, ()>(Method::GET, PROBE_PATH, None)
            .await?
            .map(Arc::<[Categoria]>::from);

        if let ApiResponse::Success { data, .. } = &response {
            self.inner
                .cache
                .insert(CacheKey::Categorias, CacheValue::Categorias(Arc::clone(data)))
                .await;
        }

        Ok(response)
    }

    /// Drop cached products and categories.
    pub fn invalidate_catalog(&self) {
        self.inner.cache.invalidate_all();
        debug!("Catalog cache invalidated");
    }
}
