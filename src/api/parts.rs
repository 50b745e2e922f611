//! Accessory and spare-part API endpoints. Both resources share one set of
//! handlers parameterized by [`PartKind`]; thin wrappers give each route a
//! concrete handler. Reads are public; mutations require a valid token.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use super::auth::AuthUser;
use super::error::ApiError;
use super::response::ApiResponse;
use crate::catalog::parts;
use crate::db::{CreatePartRequest, PartKind, PartListQuery, PartResponse, UpdatePartRequest};
use crate::AppState;

async fn list_parts(
    state: &AppState,
    kind: PartKind,
    query: PartListQuery,
) -> Result<Json<ApiResponse<Vec<PartResponse>>>, ApiError> {
    let found = parts::list(&state.db, kind, &query).await?;
    Ok(Json(ApiResponse::list(
        found.into_iter().map(Into::into).collect(),
    )))
}

async fn get_part(
    state: &AppState,
    kind: PartKind,
    id: &str,
) -> Result<Json<ApiResponse<PartResponse>>, ApiError> {
    let part = parts::get(&state.db, kind, id).await?;
    Ok(Json(ApiResponse::data(part.into())))
}

async fn get_part_by_slug(
    state: &AppState,
    kind: PartKind,
    slug: &str,
) -> Result<Json<ApiResponse<PartResponse>>, ApiError> {
    let part = parts::get_by_slug(&state.db, kind, slug).await?;
    Ok(Json(ApiResponse::data(part.into())))
}

async fn parts_for_product(
    state: &AppState,
    kind: PartKind,
    product_id: &str,
) -> Result<Json<ApiResponse<Vec<PartResponse>>>, ApiError> {
    let found = parts::find_for_product(&state.db, kind, product_id).await?;
    Ok(Json(ApiResponse::list(
        found.into_iter().map(Into::into).collect(),
    )))
}

async fn create_part(
    state: &AppState,
    auth: &AuthUser,
    kind: PartKind,
    req: CreatePartRequest,
) -> Result<(StatusCode, Json<ApiResponse<PartResponse>>), ApiError> {
    let part = parts::create(&state.db, kind, req).await?;
    tracing::info!(user = %auth.id, "Created {} {} ({})", kind.label().to_lowercase(), part.name, part.sku);
    Ok((StatusCode::CREATED, Json(ApiResponse::data(part.into()))))
}

async fn update_part(
    state: &AppState,
    auth: &AuthUser,
    kind: PartKind,
    id: &str,
    req: UpdatePartRequest,
) -> Result<Json<ApiResponse<PartResponse>>, ApiError> {
    let part = parts::update(&state.db, kind, id, req).await?;
    tracing::info!(user = %auth.id, "Updated {} {}", kind.label().to_lowercase(), part.id);
    Ok(Json(ApiResponse::data(part.into())))
}

async fn delete_part(
    state: &AppState,
    auth: &AuthUser,
    kind: PartKind,
    id: &str,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    parts::delete(&state.db, kind, id).await?;
    tracing::info!(user = %auth.id, "Deleted {} {}", kind.label().to_lowercase(), id);
    Ok(Json(ApiResponse::message(match kind {
        PartKind::Accessory => "Accessory deleted",
        PartKind::SparePart => "Spare part deleted",
    })))
}

// Accessory wrappers

pub async fn list_accessories(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PartListQuery>,
) -> Result<Json<ApiResponse<Vec<PartResponse>>>, ApiError> {
    list_parts(&state, PartKind::Accessory, query).await
}

pub async fn get_accessory(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<PartResponse>>, ApiError> {
    get_part(&state, PartKind::Accessory, &id).await
}

pub async fn get_accessory_by_slug(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<Json<ApiResponse<PartResponse>>, ApiError> {
    get_part_by_slug(&state, PartKind::Accessory, &slug).await
}

pub async fn accessories_for_product(
    State(state): State<Arc<AppState>>,
    Path(product_id): Path<String>,
) -> Result<Json<ApiResponse<Vec<PartResponse>>>, ApiError> {
    parts_for_product(&state, PartKind::Accessory, &product_id).await
}

pub async fn create_accessory(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(req): Json<CreatePartRequest>,
) -> Result<(StatusCode, Json<ApiResponse<PartResponse>>), ApiError> {
    create_part(&state, &auth, PartKind::Accessory, req).await
}

pub async fn update_accessory(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<UpdatePartRequest>,
) -> Result<Json<ApiResponse<PartResponse>>, ApiError> {
    update_part(&state, &auth, PartKind::Accessory, &id, req).await
}

pub async fn delete_accessory(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    delete_part(&state, &auth, PartKind::Accessory, &id).await
}

// Spare-part wrappers

pub async fn list_spare_parts(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PartListQuery>,
) -> Result<Json<ApiResponse<Vec<PartResponse>>>, ApiError> {
    list_parts(&state, PartKind::SparePart, query).await
}

pub async fn get_spare_part(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<PartResponse>>, ApiError> {
    get_part(&state, PartKind::SparePart, &id).await
}

pub async fn get_spare_part_by_slug(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<Json<ApiResponse<PartResponse>>, ApiError> {
    get_part_by_slug(&state, PartKind::SparePart, &slug).await
}

pub async fn spare_parts_for_product(
    State(state): State<Arc<AppState>>,
    Path(product_id): Path<String>,
) -> Result<Json<ApiResponse<Vec<PartResponse>>>, ApiError> {
    parts_for_product(&state, PartKind::SparePart, &product_id).await
}

pub async fn create_spare_part(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(req): Json<CreatePartRequest>,
) -> Result<(StatusCode, Json<ApiResponse<PartResponse>>), ApiError> {
    create_part(&state, &auth, PartKind::SparePart, req).await
}

pub async fn update_spare_part(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<UpdatePartRequest>,
) -> Result<Json<ApiResponse<PartResponse>>, ApiError> {
    update_part(&state, &auth, PartKind::SparePart, &id, req).await
}

pub async fn delete_spare_part(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    delete_part(&state, &auth, PartKind::SparePart, &id).await
}
