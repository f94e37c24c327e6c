use axum::extract::Query;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;

use crate::inbound::http::handlers::product_list;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::handlers::ProductResponseData;
use crate::inbound::http::router::AppState;

/// `GET /api/products/search?q=`; a missing or blank `q` yields an empty list.
pub async fn search_products(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<ApiSuccess<Vec<ProductResponseData>>, ApiError> {
    let query = params.q.unwrap_or_default();

    state
        .catalog_service
        .search(&query)
        .await
        .map_err(ApiError::from)
        .map(|ref products| ApiSuccess::new(StatusCode::OK, product_list(products)))
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchParams {
    q: Option<String>,
}
