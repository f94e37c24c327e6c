use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use chrono::DateTime;
use chrono::NaiveDate;
use chrono::Utc;
use serde::Serialize;

use crate::domain::product::errors::ProductError;
use crate::domain::product::models::Product;
use crate::domain::product::models::ProductDetail;
use crate::domain::product::models::ProductVariant;
use crate::domain::user::models::Gender;
use crate::domain::user::models::Role;
use crate::domain::user::models::User;
use crate::user::errors::UserError;

pub mod authentication;
pub mod products;
pub mod users;

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize + PartialEq>(StatusCode, Json<ApiResponseBody<T>>);

impl<T> PartialEq for ApiSuccess<T>
where
    T: Serialize + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 && self.1 .0 == other.1 .0
    }
}

impl<T: Serialize + PartialEq> ApiSuccess<T> {
    pub fn new(status: StatusCode, data: T) -> Self {
        ApiSuccess(status, Json(ApiResponseBody::new(status, data)))
    }
}

impl<T: Serialize + PartialEq> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    InternalServerError(String),
    UnprocessableEntity(String),
    BadRequest(String),
    NotFound(String),
    Conflict(String),
    Unauthorized(String),
}

impl ApiError {
    pub fn invalid_credentials() -> Self {
        ApiError::Unauthorized("Invalid credentials".to_string())
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(e: anyhow::Error) -> Self {
        Self::InternalServerError(e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::InternalServerError(msg) => {
                tracing::error!(error = %msg, "Request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
            ApiError::UnprocessableEntity(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
        };

        (status, Json(ApiResponseBody::new_error(status, message))).into_response()
    }
}

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound(_) | UserError::NotFoundByEmail(_) => {
                ApiError::NotFound(err.to_string())
            }
            UserError::EmailAlreadyExists(_) => ApiError::Conflict(err.to_string()),
            UserError::InvalidUserId(_)
            | UserError::InvalidEmail(_)
            | UserError::InvalidPassword(_)
            | UserError::InvalidPhoneNumber(_)
            | UserError::InvalidProfile(_) => ApiError::UnprocessableEntity(err.to_string()),
            UserError::DatabaseError(_) | UserError::Unknown(_) => {
                ApiError::InternalServerError(err.to_string())
            }
        }
    }
}

impl From<ProductError> for ApiError {
    fn from(err: ProductError) -> Self {
        match err {
            ProductError::InvalidProductId(_) => ApiError::BadRequest(err.to_string()),
            ProductError::NotFound(_) => ApiError::NotFound(err.to_string()),
            ProductError::DatabaseError(_) | ProductError::Unknown(_) => {
                ApiError::InternalServerError(err.to_string())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiResponseBody<T: Serialize + PartialEq> {
    status_code: u16,
    data: T,
}

impl<T: Serialize + PartialEq> ApiResponseBody<T> {
    pub fn new(status_code: StatusCode, data: T) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data,
        }
    }
}

impl ApiResponseBody<ApiErrorData> {
    pub fn new_error(status_code: StatusCode, message: String) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data: ApiErrorData { message },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorData {
    pub message: String,
}

/// Account profile as returned by registration and `/api/user/me`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfileData {
    pub id: String,
    pub email: String,
    pub role: Role,
    pub real_name: String,
    pub birth_date: NaiveDate,
    pub gender: Gender,
    pub phone_number: String,
    pub zonecode: String,
    pub address: String,
    pub detail_address: String,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserProfileData {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            email: user.email.as_str().to_string(),
            role: user.role,
            real_name: user.profile.real_name.clone(),
            birth_date: user.profile.birth_date,
            gender: user.profile.gender,
            phone_number: user.profile.phone_number.as_str().to_string(),
            zonecode: user.profile.zonecode.clone(),
            address: user.profile.address.clone(),
            detail_address: user.profile.detail_address.clone(),
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponseData {
    pub id: String,
    pub name: String,
    pub brand: String,
    pub price: i32,
    pub discount_price: Option<i32>,
    pub details: String,
    pub category: String,
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

impl From<&Product> for ProductResponseData {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.to_string(),
            name: product.name.clone(),
            brand: product.brand.clone(),
            price: product.price,
            discount_price: product.discount_price,
            details: product.details.clone(),
            category: product.category.clone(),
            gender: product.gender.clone(),
            description: product.description.clone(),
            main_image_url: product.main_image_url.clone(),
            image_urls: product.image_urls.clone(),
            materials: product.materials.clone(),
            colors: product.colors.clone(),
            available_sizes: product.available_sizes.clone(),
            average_rating: product.average_rating,
            review_count: product.review_count,
            is_best_seller: product.is_best_seller,
            is_new_arrival: product.is_new_arrival,
            is_kids: product.is_kids,
            created_at: product.created_at,
            updated_at: product.updated_at,
        }
    }
}

/// One color/size combination with its stock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantData {
    pub id: String,
    pub color: String,
    pub size: i32,
    pub stock_quantity: i32,
}

impl From<&ProductVariant> for VariantData {
    fn from(variant: &ProductVariant) -> Self {
        Self {
            id: variant.id.to_string(),
            color: variant.color.clone(),
            size: variant.size,
            stock_quantity: variant.stock_quantity,
        }
    }
}

/// Product detail: the list fields plus the variants.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductDetailData {
    #[serde(flatten)]
    pub product: ProductResponseData,
    pub variants: Vec<VariantData>,
}

impl From<&ProductDetail> for ProductDetailData {
    fn from(detail: &ProductDetail) -> Self {
        Self {
            product: ProductResponseData::from(&detail.product),
            variants: detail.variants.iter().map(VariantData::from).collect(),
        }
    }
}

pub(crate) fn product_list(products: &[Product]) -> Vec<ProductResponseData> {
    products.iter().map(ProductResponseData::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::product::errors::ProductIdError;
    use crate::user::errors::EmailError;

    #[test]
    fn test_user_error_mapping() {
        assert!(matches!(
            ApiError::from(UserError::EmailAlreadyExists("a@x.com".to_string())),
            ApiError::Conflict(_)
        ));
        assert!(matches!(
            ApiError::from(UserError::NotFoundByEmail("a@x.com".to_string())),
            ApiError::NotFound(_)
        ));
        assert!(matches!(
            ApiError::from(UserError::InvalidEmail(EmailError::InvalidFormat(
                "x".to_string()
            ))),
            ApiError::UnprocessableEntity(_)
        ));
        assert!(matches!(
            ApiError::from(UserError::DatabaseError("boom".to_string())),
            ApiError::InternalServerError(_)
        ));
    }

    #[test]
    fn test_product_error_mapping() {
        assert!(matches!(
            ApiError::from(ProductError::InvalidProductId(
                ProductIdError::InvalidFormat("x".to_string())
            )),
            ApiError::BadRequest(_)
        ));
        assert!(matches!(
            ApiError::from(ProductError::NotFound("1".to_string())),
            ApiError::NotFound(_)
        ));
    }

    #[test]
    fn test_product_detail_serializes_flat_with_variants() {
        let now = Utc::now();
        let product = Product {
            id: crate::domain::product::models::ProductId::new(),
            name: "StepBy 1번 제품".to_string(),
            brand: "워커월드".to_string(),
            price: 89_000,
            discount_price: None,
            details: String::new(),
            category: "sneakers".to_string(),
            gender: "공용".to_string(),
            description: String::new(),
            main_image_url: String::new(),
            image_urls: vec![],
            materials: vec![],
            colors: vec!["블랙".to_string()],
            available_sizes: vec![260],
            average_rating: 4.0,
            review_count: 3,
            is_best_seller: false,
            is_new_arrival: true,
            is_kids: false,
            created_at: now,
            updated_at: now,
        };
        let variant = ProductVariant {
            id: uuid::Uuid::new_v4(),
            product_id: product.id,
            color: "블랙".to_string(),
            size: 260,
            stock_quantity: 7,
        };
        let detail = ProductDetail {
            product,
            variants: vec![variant],
        };

        let json = serde_json::to_value(ProductDetailData::from(&detail)).unwrap();
        assert_eq!(json["brand"], "워커월드");
        assert_eq!(json["isNewArrival"], true);
        assert_eq!(json["variants"][0]["color"], "블랙");
        assert_eq!(json["variants"][0]["size"], 260);
        assert_eq!(json["variants"][0]["stockQuantity"], 7);
    }

    #[test]
    fn test_error_envelope_status() {
        let response = ApiError::invalid_credentials().into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
