//! Product API endpoints. Reads (including the composed detail views) are
//! public; mutations require a valid token.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use super::auth::AuthUser;
use super::error::ApiError;
use super::response::ApiResponse;
use super::validation::validate_uuid;
use crate::catalog::{parts, products};
use crate::db::{
    CreateProductRequest, PartKind, PartResponse, ProductDetailResponse, ProductListQuery,
    ProductResponse, UpdateProductRequest,
};
use crate::AppState;

pub async fn list_products(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ProductListQuery>,
) -> Result<Json<ApiResponse<Vec<ProductResponse>>>, ApiError> {
    let products = products::list(&state.db, &query).await?;
    Ok(Json(ApiResponse::list(
        products.into_iter().map(Into::into).collect(),
    )))
}

pub async fn get_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<ProductResponse>>, ApiError> {
    validate_uuid(&id, "product id").map_err(ApiError::bad_request)?;
    let product = products::get(&state.db, &id).await?;
    Ok(Json(ApiResponse::data(product.into())))
}

pub async fn get_product_by_slug(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<Json<ApiResponse<ProductResponse>>, ApiError> {
    let product = products::get_by_slug(&state.db, &slug).await?;
    Ok(Json(ApiResponse::data(product.into())))
}

async fn detail(
    state: &AppState,
    id: &str,
    with_spare_parts: bool,
    with_accessories: bool,
) -> Result<ProductDetailResponse, ApiError> {
    validate_uuid(id, "product id").map_err(ApiError::bad_request)?;
    let product = products::get(&state.db, id).await?;

    let compatible_spare_parts = if with_spare_parts {
        let found = parts::find_for_product(&state.db, PartKind::SparePart, id).await?;
        Some(found.into_iter().map(PartResponse::from).collect())
    } else {
        None
    };
    let compatible_accessories = if with_accessories {
        let found = parts::find_for_product(&state.db, PartKind::Accessory, id).await?;
        Some(found.into_iter().map(PartResponse::from).collect())
    } else {
        None
    };

    Ok(ProductDetailResponse {
        product: product.into(),
        compatible_spare_parts,
        compatible_accessories,
    })
}

pub async fn get_product_with_spare_parts(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<ProductDetailResponse>>, ApiError> {
    let detail = detail(&state, &id, true, false).await?;
    Ok(Json(ApiResponse::data(detail)))
}

pub async fn get_product_with_accessories(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<ProductDetailResponse>>, ApiError> {
    let detail = detail(&state, &id, false, true).await?;
    Ok(Json(ApiResponse::data(detail)))
}

pub async fn get_complete_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<ProductDetailResponse>>, ApiError> {
    let detail = detail(&state, &id, true, true).await?;
    Ok(Json(ApiResponse::data(detail)))
}

pub async fn create_product(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(req): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ProductResponse>>), ApiError> {
    let product = products::create(&state.db, req).await?;
    tracing::info!(user = %auth.id, "Created product {} ({})", product.name, product.slug);
    Ok((StatusCode::CREATED, Json(ApiResponse::data(product.into()))))
}

pub async fn update_product(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<UpdateProductRequest>,
) -> Result<Json<ApiResponse<ProductResponse>>, ApiError> {
    validate_uuid(&id, "product id").map_err(ApiError::bad_request)?;
    let product = products::update(&state.db, &id, req).await?;
    tracing::info!(user = %auth.id, "Updated product {}", product.id);
    Ok(Json(ApiResponse::data(product.into())))
}

pub async fn delete_product(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    validate_uuid(&id, "product id").map_err(ApiError::bad_request)?;
    products::delete(&state.db, &id).await?;
    tracing::info!(user = %auth.id, "Deleted product {}", id);
    Ok(Json(ApiResponse::message("Product deleted")))
}
