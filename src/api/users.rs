//! User administration endpoints. Every route requires a valid token;
//! list and delete are admin-only, profile reads and updates allow
//! self-service, password changes are self-only.

use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;

use super::auth::{require_admin, require_self_or_admin, AuthUser};
use super::error::ApiError;
use super::response::ApiResponse;
use super::validation::validate_uuid;
use crate::catalog::users;
use crate::db::{UpdatePasswordRequest, UpdateUserRequest, UserResponse};
use crate::AppState;

pub async fn list_users(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<Vec<UserResponse>>>, ApiError> {
    require_admin(&auth)?;

    let users = users::list(&state.db).await?;
    Ok(Json(ApiResponse::list(
        users.into_iter().map(Into::into).collect(),
    )))
}

pub async fn get_user(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    validate_uuid(&id, "user id").map_err(ApiError::bad_request)?;
    require_self_or_admin(&auth, &id)?;

    let user = users::get(&state.db, &id).await?;
    Ok(Json(ApiResponse::data(user.into())))
}

pub async fn update_user(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    validate_uuid(&id, "user id").map_err(ApiError::bad_request)?;
    require_self_or_admin(&auth, &id)?;

    let user = users::update(&state.db, &id, req).await?;
    tracing::info!(user = %auth.id, "Updated profile of {}", user.id);
    Ok(Json(ApiResponse::data(user.into())))
}

pub async fn update_user_password(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<UpdatePasswordRequest>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    validate_uuid(&id, "user id").map_err(ApiError::bad_request)?;

    // Password changes are strictly self-service
    if auth.id != id {
        return Err(ApiError::forbidden("Not authorized to access this route"));
    }

    if req.current_password.is_empty() || req.new_password.is_empty() {
        return Err(ApiError::bad_request(
            "Please provide current password and new password",
        ));
    }

    users::update_password(&state.db, &id, req).await?;
    tracing::info!(user = %auth.id, "Changed password");
    Ok(Json(ApiResponse::message("Password updated successfully")))
}

pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    validate_uuid(&id, "user id").map_err(ApiError::bad_request)?;
    require_admin(&auth)?;

    users::delete(&state.db, &id).await?;
    tracing::info!(user = %auth.id, "Deleted user {}", id);
    Ok(Json(ApiResponse::message("User deleted")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::auth::{register, AuthUser};
    use crate::api::error::ErrorCode;
    use crate::config::Config;
    use crate::db::{test_pool, RegisterRequest, Role};

    async fn test_state() -> Arc<AppState> {
        let mut config = Config::default();
        config.auth.jwt_secret = "test-secret".to_string();
        Arc::new(AppState::new(config, test_pool().await))
    }

    async fn seed_account(state: &Arc<AppState>, email: &str) -> String {
        let (_, Json(body)) = register(
            State(state.clone()),
            Json(RegisterRequest {
                name: "Jo Driver".to_string(),
                email: email.to_string(),
                password: "pit-lane-pass".to_string(),
            }),
        )
        .await
        .unwrap();
        body.data.unwrap().user.id
    }

    fn as_user(id: &str) -> AuthUser {
        AuthUser {
            id: id.to_string(),
            role: Role::User,
        }
    }

    fn as_admin() -> AuthUser {
        AuthUser {
            id: "admin-id".to_string(),
            role: Role::Admin,
        }
    }

    #[tokio::test]
    async fn test_list_is_admin_only() {
        let state = test_state().await;
        let id = seed_account(&state, "jo@example.com").await;

        let err = list_users(State(state.clone()), as_user(&id))
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::Forbidden);

        let Json(body) = list_users(State(state.clone()), as_admin()).await.unwrap();
        assert_eq!(body.count, Some(1));
    }

    #[tokio::test]
    async fn test_profile_update_self_or_admin() {
        let state = test_state().await;
        let jo = seed_account(&state, "jo@example.com").await;
        let sam = seed_account(&state, "sam@example.com").await;

        // Updating someone else's profile is refused
        let err = update_user(
            State(state.clone()),
            as_user(&sam),
            Path(jo.clone()),
            Json(UpdateUserRequest {
                name: Some("Hijacked".to_string()),
                email: None,
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.code(), ErrorCode::Forbidden);

        // Updating one's own profile succeeds
        let Json(body) = update_user(
            State(state.clone()),
            as_user(&jo),
            Path(jo.clone()),
            Json(UpdateUserRequest {
                name: Some("Jo Racer".to_string()),
                email: None,
            }),
        )
        .await
        .unwrap();
        assert_eq!(body.data.unwrap().name, "Jo Racer");
    }

    #[tokio::test]
    async fn test_password_change_is_self_only() {
        let state = test_state().await;
        let jo = seed_account(&state, "jo@example.com").await;

        // Even an admin may not change another user's password
        let err = update_user_password(
            State(state.clone()),
            as_admin(),
            Path(jo.clone()),
            Json(UpdatePasswordRequest {
                current_password: "pit-lane-pass".to_string(),
                new_password: "grid-walk-pass".to_string(),
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.code(), ErrorCode::Forbidden);

        update_user_password(
            State(state.clone()),
            as_user(&jo),
            Path(jo.clone()),
            Json(UpdatePasswordRequest {
                current_password: "pit-lane-pass".to_string(),
                new_password: "grid-walk-pass".to_string(),
            }),
        )
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_delete_is_admin_only() {
        let state = test_state().await;
        let jo = seed_account(&state, "jo@example.com").await;
        let sam = seed_account(&state, "sam@example.com").await;

        let err = delete_user(State(state.clone()), as_user(&sam), Path(jo.clone()))
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::Forbidden);

        delete_user(State(state.clone()), as_admin(), Path(jo.clone()))
            .await
            .unwrap();
        let err = crate::catalog::users::get(&state.db, &jo).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::NotFound);
    }
}
