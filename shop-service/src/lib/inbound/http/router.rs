use std::sync::Arc;
use std::time::Duration;

use auth::Authenticator;
use axum::body::Body;
use axum::http::header;
use axum::http::HeaderName;
use axum::http::HeaderValue;
use axum::http::Method;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use tower_http::cors::AllowHeaders;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::authentication::login;
use super::handlers::authentication::register;
use super::handlers::products::best_sellers;
use super::handlers::products::get_product;
use super::handlers::products::list_products;
use super::handlers::products::new_arrivals;
use super::handlers::products::search_products;
use super::handlers::users::get_current_user;
use super::handlers::ApiError;
use super::middleware::authenticate;
use super::middleware::authorize;
use super::policy::AccessPolicy;
use crate::config::CorsConfig;
use crate::domain::product::ports::CatalogServicePort;
use crate::domain::user::ports::AccountServicePort;

#[derive(Clone)]
pub struct AppState {
    pub account_service: Arc<dyn AccountServicePort>,
    pub catalog_service: Arc<dyn CatalogServicePort>,
    pub authenticator: Arc<Authenticator>,
    pub access_policy: Arc<AccessPolicy>,
}

impl AppState {
    pub fn new(
        account_service: Arc<dyn AccountServicePort>,
        catalog_service: Arc<dyn CatalogServicePort>,
        authenticator: Arc<Authenticator>,
    ) -> Self {
        Self {
            account_service,
            catalog_service,
            authenticator,
            access_policy: Arc::new(AccessPolicy::default()),
        }
    }
}

pub fn create_router(state: AppState, cors: &CorsConfig) -> Router {
    let auth_routes = Router::new()
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login));

    let user_routes = Router::new().route("/api/user/me", get(get_current_user));

    let product_routes = Router::new()
        .route("/api/products", get(list_products))
        .route("/api/products/bestsellers", get(best_sellers))
        .route("/api/products/new-arrivals", get(new_arrivals))
        .route("/api/products/search", get(search_products))
        .route("/api/products/:product_id", get(get_product));

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    // Layers added later wrap earlier ones: authentication runs before authorization.
    Router::new()
        .merge(auth_routes)
        .merge(user_routes)
        .merge(product_routes)
        .fallback(not_found)
        .layer(middleware::from_fn_with_state(state.clone(), authorize))
        .layer(middleware::from_fn_with_state(state.clone(), authenticate))
        .layer(trace_layer)
        .layer(cors_layer(cors))
        .with_state(state)
}

async fn not_found() -> ApiError {
    ApiError::NotFound("Resource not found".to_string())
}

/// Browser access policy.
///
/// Falls back to the local development origins when none of the configured
/// origins is usable.
pub fn cors_layer(cors: &CorsConfig) -> CorsLayer {
    let mut origins = parse_origins(&cors.allowed_origins);
    if origins.is_empty() {
        tracing::warn!("No usable CORS origins configured, using local defaults");
        origins = parse_origins(&CorsConfig::default().allowed_origins);
    }

    CorsLayer::new()
        .allow_origin(origins)
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
            Method::HEAD,
            Method::PATCH,
        ])
        .allow_headers(AllowHeaders::mirror_request())
        .expose_headers([header::AUTHORIZATION, HeaderName::from_static("refreshtoken")])
        .max_age(Duration::from_secs(3600))
}

fn parse_origins(origins: &[String]) -> Vec<HeaderValue> {
    origins
        .iter()
        .map(|origin| origin.trim())
        .filter(|origin| !origin.is_empty() && *origin != "null")
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(origin = %origin, error = %e, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use chrono::Duration;
    use http::Request;
    use http::StatusCode;
    use tower::ServiceExt;

    use super::*;
    use crate::domain::product::errors::ProductError;
    use crate::domain::product::models::Product;
    use crate::domain::product::models::ProductDetail;
    use crate::domain::product::models::ProductId;
    use crate::domain::user::models::EmailAddress;
    use crate::domain::user::models::RegisterUserCommand;
    use crate::domain::user::models::User;
    use crate::domain::user::models::UserId;
    use crate::user::errors::UserError;

    struct NoAccounts;

    #[async_trait]
    impl AccountServicePort for NoAccounts {
        async fn register(&self, command: RegisterUserCommand) -> Result<User, UserError> {
            Err(UserError::Unknown(format!("unexpected register {}", command.email)))
        }

        async fn get_user(&self, id: &UserId) -> Result<User, UserError> {
            Err(UserError::NotFound(id.to_string()))
        }

        async fn get_user_by_email(&self, email: &EmailAddress) -> Result<User, UserError> {
            Err(UserError::NotFoundByEmail(email.to_string()))
        }
    }

    struct EmptyCatalog;

    #[async_trait]
    impl CatalogServicePort for EmptyCatalog {
        async fn list_products(&self) -> Result<Vec<Product>, ProductError> {
            Ok(vec![])
        }

        async fn get_product(&self, id: &ProductId) -> Result<ProductDetail, ProductError> {
            Err(ProductError::NotFound(id.to_string()))
        }

        async fn best_sellers(&self) -> Result<Vec<Product>, ProductError> {
            Ok(vec![])
        }

        async fn new_arrivals(&self) -> Result<Vec<Product>, ProductError> {
            Ok(vec![])
        }

        async fn search(&self, _query: &str) -> Result<Vec<Product>, ProductError> {
            Ok(vec![])
        }
    }

    fn router() -> Router {
        let codec = auth::TokenCodec::new(b"router-test-secret-key-of-32-bytes!!");
        let state = AppState::new(
            Arc::new(NoAccounts),
            Arc::new(EmptyCatalog),
            Arc::new(Authenticator::new(codec, Duration::hours(1))),
        );
        create_router(state, &CorsConfig::default())
    }

    async fn status_of(request: Request<Body>) -> StatusCode {
        router().oneshot(request).await.unwrap().status()
    }

    #[tokio::test]
    async fn test_public_route_without_token() {
        let request = Request::get("/api/products").body(Body::empty()).unwrap();
        assert_eq!(status_of(request).await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_protected_route_without_token() {
        let request = Request::get("/api/user/me").body(Body::empty()).unwrap();
        assert_eq!(status_of(request).await, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_unrouted_path_is_protected() {
        let request = Request::get("/api/orders").body(Body::empty()).unwrap();
        assert_eq!(status_of(request).await, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_garbage_token_on_public_route() {
        let request = Request::get("/api/products/bestsellers")
            .header("Authorization", "Bearer not.a.token")
            .body(Body::empty())
            .unwrap();
        assert_eq!(status_of(request).await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_preflight_exposes_credentials() {
        let request = Request::options("/api/user/me")
            .header("Origin", "http://127.0.0.1:5173")
            .header("Access-Control-Request-Method", "GET")
            .body(Body::empty())
            .unwrap();

        let response = router().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()["access-control-allow-origin"],
            "http://127.0.0.1:5173"
        );
        assert_eq!(response.headers()["access-control-max-age"], "3600");
    }

    #[test]
    fn test_parse_origins_skips_unusable_entries() {
        let origins = parse_origins(&[
            "http://localhost:5173".to_string(),
            " ".to_string(),
            "null".to_string(),
            "http://bad\norigin".to_string(),
        ]);

        assert_eq!(origins, vec![HeaderValue::from_static("http://localhost:5173")]);
    }
}
