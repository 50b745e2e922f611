//! User store. Registration and login live in the auth endpoints; this
//! module covers account administration.

use chrono::Utc;

use crate::api::auth::{hash_password, verify_password};
use crate::api::error::ApiError;
use crate::api::validation::{validate_email, validate_name, validate_password};
use crate::db::{DbPool, UpdatePasswordRequest, UpdateUserRequest, User};

pub async fn list(pool: &DbPool) -> Result<Vec<User>, ApiError> {
    let users = sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY created_at DESC")
        .fetch_all(pool)
        .await?;
    Ok(users)
}

pub async fn get(pool: &DbPool, id: &str) -> Result<User, ApiError> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("User with id {} not found", id)))?;
    Ok(user)
}

pub async fn find_by_email(pool: &DbPool, email: &str) -> Result<Option<User>, ApiError> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = ?")
        .bind(email)
        .fetch_optional(pool)
        .await?;
    Ok(user)
}

/// Profile update. Role and password changes are not reachable through this
/// path; the request type does not carry them.
pub async fn update(pool: &DbPool, id: &str, req: UpdateUserRequest) -> Result<User, ApiError> {
    let user = get(pool, id).await?;

    if let Some(ref name) = req.name {
        validate_name(name).map_err(ApiError::bad_request)?;
    }
    if let Some(ref email) = req.email {
        validate_email(email).map_err(ApiError::bad_request)?;
        if email != &user.email && find_by_email(pool, email).await?.is_some() {
            return Err(ApiError::bad_request(format!(
                "Email {} is already in use",
                email
            )));
        }
    }

    let now = Utc::now().to_rfc3339();

    sqlx::query(
        r#"
        UPDATE users SET
            name = COALESCE(?, name),
            email = COALESCE(?, email),
            updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(&req.name)
    .bind(&req.email)
    .bind(&now)
    .bind(id)
    .execute(pool)
    .await?;

    get(pool, id).await
}

pub async fn update_password(
    pool: &DbPool,
    id: &str,
    req: UpdatePasswordRequest,
) -> Result<(), ApiError> {
    let user = get(pool, id).await?;

    if !verify_password(&req.current_password, &user.password_hash) {
        return Err(ApiError::unauthorized("Current password is incorrect"));
    }

    validate_password(&req.new_password).map_err(ApiError::bad_request)?;

    let password_hash = hash_password(&req.new_password)
        .map_err(|e| ApiError::internal(format!("Failed to hash password: {}", e)))?;
    let now = Utc::now().to_rfc3339();

    sqlx::query("UPDATE users SET password_hash = ?, updated_at = ? WHERE id = ?")
        .bind(&password_hash)
        .bind(&now)
        .bind(id)
        .execute(pool)
        .await?;

    Ok(())
}

pub async fn delete(pool: &DbPool, id: &str) -> Result<(), ApiError> {
    let user = get(pool, id).await?;

    sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(&user.id)
        .execute(pool)
        .await?;

    Ok(())
}
