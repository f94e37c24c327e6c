use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::product::errors::ProductError;
use crate::domain::product::models::Product;
use crate::domain::product::models::ProductDetail;
use crate::domain::product::models::ProductId;
use crate::domain::product::ports::CatalogServicePort;
use crate::domain::product::ports::ProductRepository;

/// Read-only catalog facade over a product repository.
pub struct CatalogService<PR>
where
    PR: ProductRepository,
{
    repository: Arc<PR>,
}

impl<PR> CatalogService<PR>
where
    PR: ProductRepository,
{
    pub fn new(repository: Arc<PR>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl<PR> CatalogServicePort for CatalogService<PR>
where
    PR: ProductRepository,
{
    async fn list_products(&self) -> Result<Vec<Product>, ProductError> {
        self.repository.list_all().await
    }

    async fn get_product(&self, id: &ProductId) -> Result<ProductDetail, ProductError> {
        let product = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or(ProductError::NotFound(id.to_string()))?;
        let variants = self.repository.find_variants(id).await?;

        Ok(ProductDetail { product, variants })
    }

    async fn best_sellers(&self) -> Result<Vec<Product>, ProductError> {
        self.repository.find_best_sellers().await
    }

    async fn new_arrivals(&self) -> Result<Vec<Product>, ProductError> {
        self.repository.find_new_arrivals().await
    }

    async fn search(&self, query: &str) -> Result<Vec<Product>, ProductError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        self.repository.search_by_name_or_brand(query).await
    }
}
