use axum::{
    extract::State,
    response::{IntoResponse, Json},
};

use crate::catalog::PriceQuote;
use crate::services::pricing::QuoteRequest;
use crate::{errors::ServiceError, ApiResponse, AppState};

#[utoipa::path(
    post,
    path = "/api/v1/pricing/quote",
    summary = "Price a product selection",
    description = "Compute unit price, total and savings for a product/variant/quantity selection",
    request_body = QuoteRequest,
    responses(
        (status = 200, description = "Quote computed", body = ApiResponse<PriceQuote>),
        (status = 400, description = "Unknown variant or option", body = crate::errors::ErrorResponse),
        (status = 404, description = "Product not found", body = crate::errors::ErrorResponse),
        (status = 502, description = "CMS unavailable", body = crate::errors::ErrorResponse),
    ),
    tag = "pricing"
)]
pub async fn quote(
    State(state): State<AppState>,
    Json(request): Json<QuoteRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let quote = state.services.pricing.quote(request).await?;
    Ok(Json(ApiResponse::success(quote)))
}
