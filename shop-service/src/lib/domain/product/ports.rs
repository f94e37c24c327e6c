use async_trait::async_trait;

use crate::domain::product::errors::ProductError;
use crate::domain::product::models::Product;
use crate::domain::product::models::ProductDetail;
use crate::domain::product::models::ProductId;
use crate::domain::product::models::ProductVariant;

/// Port for read-only catalog operations.
#[async_trait]
pub trait CatalogServicePort: Send + Sync + 'static {
    /// All products in the catalog.
    async fn list_products(&self) -> Result<Vec<Product>, ProductError>;

    /// Retrieve a single product with its variants.
    ///
    /// # Errors
    /// * `NotFound` - Product does not exist
    /// * `DatabaseError` - Database operation failed
    async fn get_product(&self, id: &ProductId) -> Result<ProductDetail, ProductError>;

    /// Products flagged as best sellers.
    async fn best_sellers(&self) -> Result<Vec<Product>, ProductError>;

    /// Products flagged as new arrivals.
    async fn new_arrivals(&self) -> Result<Vec<Product>, ProductError>;

    /// Products whose name or brand contains `query`, ignoring case.
    ///
    /// A blank query yields an empty list.
    async fn search(&self, query: &str) -> Result<Vec<Product>, ProductError>;
}

/// Persistence operations for the catalog.
#[async_trait]
pub trait ProductRepository: Send + Sync + 'static {
    async fn list_all(&self) -> Result<Vec<Product>, ProductError>;

    async fn find_by_id(&self, id: &ProductId) -> Result<Option<Product>, ProductError>;

    /// Variants of a product, ordered by color then size.
    async fn find_variants(&self, id: &ProductId) -> Result<Vec<ProductVariant>, ProductError>;

    async fn find_best_sellers(&self) -> Result<Vec<Product>, ProductError>;

    async fn find_new_arrivals(&self) -> Result<Vec<Product>, ProductError>;

    /// Case-insensitive substring match on name or brand.
    async fn search_by_name_or_brand(&self, query: &str) -> Result<Vec<Product>, ProductError>;

    /// Number of products in the catalog.
    async fn count(&self) -> Result<i64, ProductError>;

    /// Persist a product together with its variants.
    async fn create(
        &self,
        product: Product,
        variants: Vec<ProductVariant>,
    ) -> Result<Product, ProductError>;
}
