use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::product::errors::ProductError;
use crate::domain::product::models::Product;
use crate::domain::product::models::ProductId;
use crate::domain::product::models::ProductVariant;
use crate::domain::product::ports::ProductRepository;

const PRODUCT_COLUMNS: &str = r#"
    id, name, brand, price, discount_price, details, category, gender, description,
    main_image_url, image_urls, materials, colors, available_sizes, average_rating,
    review_count, is_best_seller, is_new_arrival, is_kids, created_at, updated_at
"#;

#[derive(sqlx::FromRow)]
struct ProductRow {
    id: Uuid,
    name: String,
    brand: String,
    price: i32,
    discount_price: Option<i32>,
    details: String,
    category: String,
    gender: String,
    description: String,
    main_image_url: String,
    image_urls: Vec<String>,
    materials: Vec<String>,
    colors: Vec<String>,
    available_sizes: Vec<i32>,
    average_rating: f64,
    review_count: i32,
    is_best_seller: bool,
    is_new_arrival: bool,
    is_kids: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(r: ProductRow) -> Self {
        Product {
            id: ProductId(r.id),
            name: r.name,
            brand: r.brand,
            price: r.price,
            discount_price: r.discount_price,
            details: r.details,
            category: r.category,
            gender: r.gender,
            description: r.description,
            main_image_url: r.main_image_url,
            image_urls: r.image_urls,
            materials: r.materials,
            colors: r.colors,
            available_sizes: r.available_sizes,
            average_rating: r.average_rating,
            review_count: r.review_count,
            is_best_seller: r.is_best_seller,
            is_new_arrival: r.is_new_arrival,
            is_kids: r.is_kids,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ProductVariantRow {
    id: Uuid,
    product_id: Uuid,
    color: String,
    size: i32,
    stock_quantity: i32,
}

impl From<ProductVariantRow> for ProductVariant {
    fn from(r: ProductVariantRow) -> Self {
        ProductVariant {
            id: r.id,
            product_id: ProductId(r.product_id),
            color: r.color,
            size: r.size,
            stock_quantity: r.stock_quantity,
        }
    }
}

pub struct PostgresProductRepository {
    pool: PgPool,
}

impl PostgresProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_where(
        &self,
        predicate: &str,
        argument: Option<&str>,
    ) -> Result<Vec<Product>, ProductError> {
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products {predicate} ORDER BY created_at DESC, name"
        );
        let mut query = sqlx::query_as::<_, ProductRow>(&sql);
        if let Some(argument) = argument {
            query = query.bind(argument);
        }

        let rows = query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| ProductError::DatabaseError(e.to_string()))?;

        Ok(rows.into_iter().map(Product::from).collect())
    }
}

#[async_trait]
impl ProductRepository for PostgresProductRepository {
    async fn list_all(&self) -> Result<Vec<Product>, ProductError> {
        self.fetch_where("", None).await
    }

    async fn find_by_id(&self, id: &ProductId) -> Result<Option<Product>, ProductError> {
        let row: Option<ProductRow> =
            sqlx::query_as(&format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"))
                .bind(id.0)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| ProductError::DatabaseError(e.to_string()))?;

        Ok(row.map(Product::from))
    }

    async fn find_variants(&self, id: &ProductId) -> Result<Vec<ProductVariant>, ProductError> {
        let rows: Vec<ProductVariantRow> = sqlx::query_as(
            r#"
            SELECT id, product_id, color, size, stock_quantity
            FROM product_variants
            WHERE product_id = $1
            ORDER BY color, size
            "#,
        )
        .bind(id.0)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| ProductError::DatabaseError(e.to_string()))?;

        Ok(rows.into_iter().map(ProductVariant::from).collect())
    }

    async fn find_best_sellers(&self) -> Result<Vec<Product>, ProductError> {
        self.fetch_where("WHERE is_best_seller", None).await
    }

    async fn find_new_arrivals(&self) -> Result<Vec<Product>, ProductError> {
        self.fetch_where("WHERE is_new_arrival", None).await
    }

    async fn search_by_name_or_brand(&self, query: &str) -> Result<Vec<Product>, ProductError> {
        let pattern = format!("%{}%", escape_like(query));
        self.fetch_where(
            r"WHERE name ILIKE $1 ESCAPE '\' OR brand ILIKE $1 ESCAPE '\'",
            Some(&pattern),
        )
        .await
    }

    async fn count(&self) -> Result<i64, ProductError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| ProductError::DatabaseError(e.to_string()))?;

        Ok(count)
    }

    async fn create(
        &self,
        product: Product,
        variants: Vec<ProductVariant>,
    ) -> Result<Product, ProductError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| ProductError::DatabaseError(e.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO products (
                id, name, brand, price, discount_price, details, category, gender, description,
                main_image_url, image_urls, materials, colors, available_sizes, average_rating,
                review_count, is_best_seller, is_new_arrival, is_kids, created_at, updated_at
            )
            VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11,
                $12, $13, $14, $15, $16, $17, $18, $19, $20, $21
            )
            "#,
        )
        .bind(product.id.0)
        .bind(&product.name)
        .bind(&product.brand)
        .bind(product.price)
        .bind(product.discount_price)
        .bind(&product.details)
        .bind(&product.category)
        .bind(&product.gender)
        .bind(&product.description)
        .bind(&product.main_image_url)
        .bind(&product.image_urls[..])
        .bind(&product.materials[..])
        .bind(&product.colors[..])
        .bind(&product.available_sizes[..])
        .bind(product.average_rating)
        .bind(product.review_count)
        .bind(product.is_best_seller)
        .bind(product.is_new_arrival)
        .bind(product.is_kids)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| ProductError::DatabaseError(e.to_string()))?;

        for variant in &variants {
            sqlx::query(
                r#"
                INSERT INTO product_variants (id, product_id, color, size, stock_quantity)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(variant.id)
            .bind(product.id.0)
            .bind(&variant.color)
            .bind(variant.size)
            .bind(variant.stock_quantity)
            .execute(&mut *tx)
            .await
            .map_err(|e| ProductError::DatabaseError(e.to_string()))?;
        }

        tx.commit()
            .await
            .map_err(|e| ProductError::DatabaseError(e.to_string()))?;

        Ok(product)
    }
}

/// Escape LIKE wildcards so user input matches literally.
fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
