//! Brand API endpoints. Reads are public; mutations require a valid token.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use super::auth::AuthUser;
use super::error::ApiError;
use super::response::ApiResponse;
use super::validation::validate_uuid;
use crate::catalog::brands;
use crate::db::{Brand, CreateBrandRequest, UpdateBrandRequest};
use crate::AppState;

pub async fn list_brands(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<Brand>>>, ApiError> {
    let brands = brands::list(&state.db).await?;
    Ok(Json(ApiResponse::list(brands)))
}

pub async fn get_brand(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Brand>>, ApiError> {
    validate_uuid(&id, "brand id").map_err(ApiError::bad_request)?;
    let brand = brands::get(&state.db, &id).await?;
    Ok(Json(ApiResponse::data(brand)))
}

pub async fn create_brand(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(req): Json<CreateBrandRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Brand>>), ApiError> {
    let brand = brands::create(&state.db, req).await?;
    tracing::info!(user = %auth.id, "Created brand {}", brand.name);
    Ok((StatusCode::CREATED, Json(ApiResponse::data(brand))))
}

pub async fn update_brand(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<UpdateBrandRequest>,
) -> Result<Json<ApiResponse<Brand>>, ApiError> {
    validate_uuid(&id, "brand id").map_err(ApiError::bad_request)?;
    let brand = brands::update(&state.db, &id, req).await?;
    tracing::info!(user = %auth.id, "Updated brand {}", brand.name);
    Ok(Json(ApiResponse::data(brand)))
}

pub async fn delete_brand(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    validate_uuid(&id, "brand id").map_err(ApiError::bad_request)?;
    brands::delete(&state.db, &id).await?;
    tracing::info!(user = %auth.id, "Deleted brand {}", id);
    Ok(Json(ApiResponse::message("Brand deleted")))
}
