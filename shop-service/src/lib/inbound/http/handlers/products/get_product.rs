use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;

use crate::domain::product::models::ProductId;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::handlers::ProductDetailData;
use crate::inbound::http::router::AppState;

/// Product detail including its color/size variants.
pub async fn get_product(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
) -> Result<ApiSuccess<ProductDetailData>, ApiError> {
    let product_id =
        ProductId::from_string(&product_id).map_err(|e| ApiError::BadRequest(e.to_string()))?;

    state
        .catalog_service
        .get_product(&product_id)
        .await
        .map_err(ApiError::from)
        .map(|ref detail| ApiSuccess::new(StatusCode::OK, detail.into()))
}
