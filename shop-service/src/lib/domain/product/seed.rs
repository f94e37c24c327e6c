//! Demo catalog generation.
//!
//! Only the `seed-catalog` binary calls into this module; the server never
//! writes products on startup.

use std::collections::HashSet;

use chrono::Utc;
use rand::seq::SliceRandom;
use rand::Rng;
use uuid::Uuid;

use crate::domain::product::errors::ProductError;
use crate::domain::product::models::Product;
use crate::domain::product::models::ProductId;
use crate::domain::product::models::ProductVariant;
use crate::domain::product::ports::ProductRepository;

pub const DEFAULT_PRODUCT_COUNT: usize = 20;

const BRANDS: [&str; 5] = [
    "스텝바이브랜드",
    "SOBOOM 슈즈",
    "워커월드",
    "스피드런",
    "스텝바이키즈",
];
const CATEGORIES: [&str; 5] = ["sneakers", "sports", "shoes", "sandles", "boots"];
const AUDIENCES: [&str; 3] = ["남성", "여성", "공용"];
const COLORS: [&str; 6] = ["블랙", "화이트", "그레이", "레드", "블루", "그린"];
const SIZES: [i32; 7] = [230, 240, 250, 260, 270, 280, 290];
const IMAGE_URL: &str =
    "https://cdn.shoemarker.co.kr/Upload/ProductImage/080207/49447_1_0320_0320.jpg";

/// Build `count` random products, each with its variants.
///
/// Every product gets one or two distinct colors and three to five distinct
/// sizes. Each color receives one to three variants drawn from those sizes,
/// so `(color, size)` never repeats within a product.
pub fn generate_catalog<R: Rng + ?Sized>(
    rng: &mut R,
    count: usize,
) -> Vec<(Product, Vec<ProductVariant>)> {
    (0..count).map(|index| generate_product(rng, index)).collect()
}

fn generate_product<R: Rng + ?Sized>(rng: &mut R, index: usize) -> (Product, Vec<ProductVariant>) {
    let name = format!("StepBy {}번 제품", index + 1);
    let brand = pick(rng, &BRANDS).to_string();
    let category = pick(rng, &CATEGORIES).to_string();

    let price: i32 = rng.gen_range(0..100) * 1000 + 50_000;
    let discount_price = if rng.gen_bool(0.5) {
        let ratio = rng.gen_range(0.7..0.9);
        Some((f64::from(price) * ratio) as i32)
    } else {
        None
    };

    let color_count = rng.gen_range(1..=2);
    let colors: Vec<String> = COLORS
        .choose_multiple(rng, color_count)
        .map(|c| c.to_string())
        .collect();

    let size_count = rng.gen_range(3..=5);
    let mut available_sizes: Vec<i32> = SIZES.choose_multiple(rng, size_count).copied().collect();
    available_sizes.sort_unstable();

    let second_material = if rng.gen_bool(0.5) { "합성 섬유" } else { "고무" };
    let average_rating = (rng.gen_range(1.0..=5.0_f64) * 10.0).round() / 10.0;

    let now = Utc::now();
    let product = Product {
        id: ProductId::new(),
        details: format!("이 제품은 StepBy {}의 상세 정보입니다.", name),
        description: format!(
            "최고급 소재로 제작된 {}의 {}입니다. 착화감이 뛰어나며 스타일을 완성해줍니다.",
            brand, category
        ),
        name,
        brand,
        price,
        discount_price,
        category,
        gender: pick(rng, &AUDIENCES).to_string(),
        main_image_url: IMAGE_URL.to_string(),
        image_urls: vec![IMAGE_URL.to_string(), IMAGE_URL.to_string()],
        materials: vec!["가죽".to_string(), second_material.to_string()],
        colors,
        available_sizes,
        average_rating,
        review_count: rng.gen_range(0..200),
        is_best_seller: rng.gen_bool(0.5),
        is_new_arrival: rng.gen_bool(0.5),
        is_kids: rng.gen_bool(0.5),
        created_at: now,
        updated_at: now,
    };

    let variants = generate_variants(rng, &product);
    (product, variants)
}

fn generate_variants<R: Rng + ?Sized>(rng: &mut R, product: &Product) -> Vec<ProductVariant> {
    let mut seen = HashSet::new();
    let mut variants = Vec::new();

    for color in &product.colors {
        let picks = rng.gen_range(1..=product.available_sizes.len().min(3));
        for size in product.available_sizes.choose_multiple(rng, picks) {
            if !seen.insert((color.clone(), *size)) {
                continue;
            }
            variants.push(ProductVariant {
                id: Uuid::new_v4(),
                product_id: product.id,
                color: color.clone(),
                size: *size,
                stock_quantity: rng.gen_range(10..110),
            });
        }
    }

    variants
}

fn pick<'a, R: Rng + ?Sized>(rng: &mut R, values: &'a [&'a str]) -> &'a str {
    values.choose(rng).copied().unwrap_or_default()
}

/// Populate the catalog when it is empty.
///
/// Returns the number of products written; zero when products already exist.
pub async fn seed_if_empty<PR, R>(
    repository: &PR,
    rng: &mut R,
    count: usize,
) -> Result<usize, ProductError>
where
    PR: ProductRepository + ?Sized,
    R: Rng + ?Sized,
{
    let existing = repository.count().await?;
    if existing > 0 {
        tracing::info!(existing, "Catalog already populated, skipping seed");
        return Ok(0);
    }

    let catalog = generate_catalog(rng, count);
    let mut written = 0;
    for (product, variants) in catalog {
        let variant_count = variants.len();
        let product = repository.create(product, variants).await?;
        tracing::debug!(product_id = %product.id, variants = variant_count, "Product seeded");
        written += 1;
    }

    tracing::info!(products = written, "Catalog seeded");
    Ok(written)
}
