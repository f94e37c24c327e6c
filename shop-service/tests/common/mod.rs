#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use auth::Authenticator;
use auth::Clock;
use auth::SystemClock;
use auth::TokenCodec;
use chrono::Duration;
use chrono::Utc;
use serde_json::json;
use shop_service::config::CorsConfig;
use shop_service::domain::product::errors::ProductError;
use shop_service::domain::product::models::Product;
use shop_service::domain::product::models::ProductId;
use shop_service::domain::product::models::ProductVariant;
use shop_service::domain::product::ports::ProductRepository;
use shop_service::domain::product::service::CatalogService;
use shop_service::domain::user::errors::UserError;
use shop_service::domain::user::models::EmailAddress;
use shop_service::domain::user::models::User;
use shop_service::domain::user::models::UserId;
use shop_service::domain::user::ports::UserRepository;
use shop_service::domain::user::service::AccountService;
use shop_service::inbound::http::router::create_router;
use shop_service::inbound::http::router::AppState;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Base64 signing secret used by every test server
pub const TEST_SECRET: &str = "dGVzdC1zZWNyZXQta2V5LWZvci1qd3Qtc2lnbmluZy1hdC1sZWFzdC0zMi1ieXRlcw==";

/// A different key, for tokens the server must not accept
pub const OTHER_SECRET: &str = "YW5vdGhlci1zZWNyZXQta2V5LWZvci1qd3Qtc2lnbmluZy0zMi1ieXRlcyEh";

pub const TEST_PASSWORD: &str = "password123";

/// In-memory user store behind the repository port
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<UserId, User>>,
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> Result<User, UserError> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == user.email) {
            return Err(UserError::EmailAlreadyExists(user.email.to_string()));
        }
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError> {
        Ok(self.users.read().await.get(id).cloned())
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, UserError> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| &u.email == email)
            .cloned())
    }

    async fn exists_by_email(&self, email: &EmailAddress) -> Result<bool, UserError> {
        Ok(self.users.read().await.values().any(|u| &u.email == email))
    }
}

/// In-memory catalog behind the repository port
#[derive(Default)]
pub struct InMemoryProductRepository {
    products: RwLock<Vec<(Product, Vec<ProductVariant>)>>,
}

impl InMemoryProductRepository {
    async fn filtered(&self, predicate: impl Fn(&Product) -> bool) -> Vec<Product> {
        self.products
            .read()
            .await
            .iter()
            .map(|(product, _)| product)
            .filter(|product| predicate(product))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn list_all(&self) -> Result<Vec<Product>, ProductError> {
        Ok(self.filtered(|_| true).await)
    }

    async fn find_by_id(&self, id: &ProductId) -> Result<Option<Product>, ProductError> {
        Ok(self.filtered(|p| p.id == *id).await.into_iter().next())
    }

    async fn find_variants(&self, id: &ProductId) -> Result<Vec<ProductVariant>, ProductError> {
        let mut variants: Vec<ProductVariant> = self
            .products
            .read()
            .await
            .iter()
            .filter(|(product, _)| product.id == *id)
            .flat_map(|(_, variants)| variants.iter().cloned())
            .collect();
        variants.sort_by(|a, b| (&a.color, a.size).cmp(&(&b.color, b.size)));
        Ok(variants)
    }

    async fn find_best_sellers(&self) -> Result<Vec<Product>, ProductError> {
        Ok(self.filtered(|p| p.is_best_seller).await)
    }

    async fn find_new_arrivals(&self) -> Result<Vec<Product>, ProductError> {
        Ok(self.filtered(|p| p.is_new_arrival).await)
    }

    async fn search_by_name_or_brand(&self, query: &str) -> Result<Vec<Product>, ProductError> {
        Ok(self.filtered(|p| p.matches_query(query)).await)
    }

    async fn count(&self) -> Result<i64, ProductError> {
        Ok(self.products.read().await.len() as i64)
    }

    async fn create(
        &self,
        product: Product,
        variants: Vec<ProductVariant>,
    ) -> Result<Product, ProductError> {
        self.products
            .write()
            .await
            .push((product.clone(), variants));
        Ok(product)
    }
}

/// Test application that spawns a real server
pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub api_client: reqwest::Client,
    pub products: Arc<InMemoryProductRepository>,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        Self::spawn_with_clock(Arc::new(SystemClock)).await
    }

    /// Spawn the application with a server clock other than the system clock
    pub async fn spawn_with_clock(clock: Arc<dyn Clock>) -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let user_repository = Arc::new(InMemoryUserRepository::default());
        let product_repository = Arc::new(InMemoryProductRepository::default());

        let account_service = Arc::new(AccountService::new(user_repository));
        let catalog_service = Arc::new(CatalogService::new(Arc::clone(&product_repository)));

        let authenticator = Arc::new(
            Authenticator::new(test_codec(TEST_SECRET), Duration::hours(24)).with_clock(clock),
        );

        let state = AppState::new(account_service, catalog_service, authenticator);
        let router = create_router(state, &CorsConfig::default());

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            port,
            api_client: reqwest::Client::new(),
            products: product_repository,
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    /// Register an account with a valid profile
    pub async fn register(&self, email: &str) -> reqwest::Response {
        self.post("/api/auth/register")
            .json(&registration_body(email, TEST_PASSWORD))
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Log in and return the access token
    pub async fn login(&self, email: &str, password: &str) -> String {
        let response = self
            .post("/api/auth/login")
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), reqwest::StatusCode::OK);

        let body: serde_json::Value = response.json().await.expect("Failed to parse response");
        body["data"]["accessToken"]
            .as_str()
            .expect("accessToken missing")
            .to_string()
    }

    /// Register then log in
    pub async fn register_and_login(&self, email: &str) -> String {
        let response = self.register(email).await;
        assert_eq!(response.status(), reqwest::StatusCode::CREATED);
        self.login(email, TEST_PASSWORD).await
    }

    /// Put a product straight into the catalog
    pub async fn add_product(&self, product: Product) -> Product {
        let variants = vec![ProductVariant {
            id: Uuid::new_v4(),
            product_id: product.id,
            color: "블랙".to_string(),
            size: 260,
            stock_quantity: 10,
        }];
        self.products
            .create(product, variants)
            .await
            .expect("Failed to insert product")
    }
}

pub fn test_codec(secret: &str) -> TokenCodec {
    TokenCodec::from_base64_secret(secret).expect("test secret is valid base64")
}

pub fn registration_body(email: &str, password: &str) -> serde_json::Value {
    json!({
        "email": email,
        "password": password,
        "realName": "홍길동",
        "birthDate": "1995-03-09",
        "gender": "남성",
        "phoneNumber": "010-1234-5678",
        "zonecode": "06236",
        "address": "서울특별시 강남구 테헤란로 152",
        "detailAddress": "12층"
    })
}

pub fn product(name: &str, brand: &str) -> Product {
    let now = Utc::now();
    Product {
        id: ProductId::new(),
        name: name.to_string(),
        brand: brand.to_string(),
        price: 89_000,
        discount_price: Some(69_000),
        details: format!("이 제품은 StepBy {}의 상세 정보입니다.", name),
        category: "sneakers".to_string(),
        gender: "공용".to_string(),
        description: "description".to_string(),
        main_image_url: "https://cdn.example.com/main.jpg".to_string(),
        image_urls: vec!["https://cdn.example.com/main.jpg".to_string()],
        materials: vec!["가죽".to_string(), "고무".to_string()],
        colors: vec!["블랙".to_string()],
        available_sizes: vec![250, 260, 270],
        average_rating: 4.2,
        review_count: 17,
        is_best_seller: false,
        is_new_arrival: false,
        is_kids: false,
        created_at: now,
        updated_at: now,
    }
}
