use std::fmt;

use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::product::errors::ProductIdError;

/// Catalog product.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub brand: String,
    pub price: i32,
    pub discount_price: Option<i32>,
    pub details: String,
    pub category: String,
    /// Target audience label as shown in the storefront (not an account gender)
    pub gender: String,
    pub description: String,
    pub main_image_url: String,
    pub image_urls: Vec<String>,
    pub materials: Vec<String>,
    pub colors: Vec<String>,
    pub available_sizes: Vec<i32>,
    pub average_rating: f64,
    pub review_count: i32,
    pub is_best_seller: bool,
    pub is_new_arrival: bool,
    pub is_kids: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Case-insensitive substring match on name or brand.
    pub fn matches_query(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.name.to_lowercase().contains(&query) || self.brand.to_lowercase().contains(&query)
    }
}

/// Product unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProductId(pub Uuid);

impl ProductId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a product ID from string.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, ProductIdError> {
        Uuid::parse_str(s)
            .map(ProductId)
            .map_err(|e| ProductIdError::InvalidFormat(e.to_string()))
    }
}

impl Default for ProductId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Stock-keeping unit of a product: one color in one size.
///
/// `(product_id, color, size)` is unique.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductVariant {
    pub id: Uuid,
    pub product_id: ProductId,
    pub color: String,
    pub size: i32,
    pub stock_quantity: i32,
}

/// A product together with its stock-keeping units.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDetail {
    pub product: Product,
    pub variants: Vec<ProductVariant>,
}
