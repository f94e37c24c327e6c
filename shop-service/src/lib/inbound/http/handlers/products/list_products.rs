use axum::extract::State;
use axum::http::StatusCode;

use crate::inbound::http::handlers::product_list;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::handlers::ProductResponseData;
use crate::inbound::http::router::AppState;

pub async fn list_products(
    State(state): State<AppState>,
) -> Result<ApiSuccess<Vec<ProductResponseData>>, ApiError> {
    state
        .catalog_service
        .list_products()
        .await
        .map_err(ApiError::from)
        .map(|ref products| ApiSuccess::new(StatusCode::OK, product_list(products)))
}
