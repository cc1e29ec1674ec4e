use axum::{
    extract::{Path, State},
    response::{IntoResponse, Json},
};

use crate::catalog::Product;
use crate::{errors::ServiceError, ApiResponse, AppState};

#[utoipa::path(
    get,
    path = "/api/v1/products",
    summary = "List products",
    responses(
        (status = 200, description = "Products retrieved", body = ApiResponse<Vec<Product>>),
        (status = 502, description = "CMS unavailable", body = crate::errors::ErrorResponse),
    ),
    tag = "catalog"
)]
pub async fn list_products(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ServiceError> {
    let products = state.services.cms.list_products().await?;
    Ok(Json(ApiResponse::success(products)))
}

#[utoipa::path(
    get,
    path = "/api/v1/products/{slug}",
    summary = "Get product",
    params(("slug" = String, Path, description = "Product slug")),
    responses(
        (status = 200, description = "Product retrieved", body = ApiResponse<Product>),
        (status = 404, description = "Product not found", body = crate::errors::ErrorResponse),
        (status = 502, description = "CMS unavailable", body = crate::errors::ErrorResponse),
    ),
    tag = "catalog"
)]
pub async fn get_product(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, ServiceError> {
    let product = state
        .services
        .cms
        .get_product(&slug)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Product {} not found", slug)))?;
    Ok(Json(ApiResponse::success(product)))
}
