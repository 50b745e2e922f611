//! Authentication and authorization: argon2 password hashing, HS256 bearer
//! tokens, the `AuthUser` extractor, and the auth endpoints.
//!
//! The authenticated identity is always an explicit handler input; nothing
//! is attached to ambient request state.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{
    async_trait,
    extract::{FromRequestParts, State},
    http::{request::Parts, StatusCode},
    Json,
};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use super::error::ApiError;
use super::response::ApiResponse;
use super::validation::{validate_email, validate_name, validate_password};
use crate::catalog::users;
use crate::db::{AuthResponse, DbPool, LoginRequest, RegisterRequest, Role, User, UserResponse};
use crate::AppState;

/// Hash a password using Argon2
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2.hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Verify a password against a hash
pub fn verify_password(password: &str, hash: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

/// Bearer token payload
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: String,
    pub role: Role,
    pub iat: usize,
    pub exp: usize,
}

/// Issue a signed token for a user with a fixed expiry from now
pub fn issue_token(user: &User, secret: &str, ttl_minutes: i64) -> Result<String, ApiError> {
    let now = Utc::now().timestamp();
    let claims = Claims {
        sub: user.id.clone(),
        role: user.role,
        iat: now as usize,
        exp: (now + ttl_minutes * 60) as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| ApiError::internal(format!("Failed to sign token: {}", e)))
}

/// Decode and verify a token, including its expiry
pub fn decode_token(token: &str, secret: &str) -> Result<Claims, ApiError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
            ApiError::unauthorized("Token expired")
        }
        _ => ApiError::unauthorized("Invalid token"),
    })
}

/// The authenticated caller, extracted from the Authorization header
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: String,
    pub role: Role,
}

#[async_trait]
impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get("Authorization")
            .and_then(|h| h.to_str().ok())
            .ok_or_else(|| ApiError::unauthorized("Authentication required"))?;

        let token = header
            .strip_prefix("Bearer ")
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ApiError::unauthorized("Authentication required"))?;

        let claims = decode_token(token, &state.config.auth.jwt_secret)?;
        Ok(AuthUser {
            id: claims.sub,
            role: claims.role,
        })
    }
}

/// Admins pass; everyone else is refused
pub fn require_admin(auth: &AuthUser) -> Result<(), ApiError> {
    if auth.role.is_admin() {
        Ok(())
    } else {
        Err(ApiError::forbidden("Not authorized to access this route"))
    }
}

/// Admins pass; non-admins only when acting on their own resource
pub fn require_self_or_admin(auth: &AuthUser, owner_id: &str) -> Result<(), ApiError> {
    if auth.role.is_admin() || auth.id == owner_id {
        Ok(())
    } else {
        Err(ApiError::forbidden("Not authorized to access this route"))
    }
}

/// Register a new user account (always role=user)
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AuthResponse>>), ApiError> {
    validate_name(&req.name).map_err(ApiError::bad_request)?;
    validate_email(&req.email).map_err(ApiError::bad_request)?;
    validate_password(&req.password).map_err(ApiError::bad_request)?;

    if users::find_by_email(&state.db, &req.email).await?.is_some() {
        return Err(ApiError::conflict("Email already in use"));
    }

    let id = Uuid::new_v4().to_string();
    let now = Utc::now().to_rfc3339();
    let password_hash = hash_password(&req.password)
        .map_err(|e| ApiError::internal(format!("Failed to hash password: {}", e)))?;

    sqlx::query(
        "INSERT INTO users (id, name, email, password_hash, role, is_active, created_at, updated_at) \
         VALUES (?, ?, ?, ?, 'user', 1, ?, ?)",
    )
    .bind(&id)
    .bind(&req.name)
    .bind(&req.email)
    .bind(&password_hash)
    .bind(&now)
    .bind(&now)
    .execute(&state.db)
    .await?;

    let user = users::get(&state.db, &id).await?;
    let token = issue_token(
        &user,
        &state.config.auth.jwt_secret,
        state.config.auth.token_ttl_minutes,
    )?;

    tracing::info!(user = %user.id, "Registered user {}", user.email);

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::data(AuthResponse {
            user: user.into(),
            token,
        })),
    ))
}

/// Log in with email and password.
///
/// Unknown email, deactivated account and wrong password all produce the
/// same "Invalid credentials" response so accounts cannot be enumerated.
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<ApiResponse<AuthResponse>>, ApiError> {
    if req.email.is_empty() || req.password.is_empty() {
        return Err(ApiError::bad_request("Please provide email and password"));
    }

    let user = users::find_by_email(&state.db, &req.email)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Invalid credentials"))?;

    if !user.is_active {
        return Err(ApiError::unauthorized("Invalid credentials"));
    }

    if !verify_password(&req.password, &user.password_hash) {
        return Err(ApiError::unauthorized("Invalid credentials"));
    }

    let token = issue_token(
        &user,
        &state.config.auth.jwt_secret,
        state.config.auth.token_ttl_minutes,
    )?;

    Ok(Json(ApiResponse::data(AuthResponse {
        user: user.into(),
        token,
    })))
}

/// Get the profile of the authenticated caller
pub async fn me(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    let user = users::get(&state.db, &auth.id).await?;
    Ok(Json(ApiResponse::data(user.into())))
}

/// Create the configured admin account at startup when it does not exist.
/// `register` only ever produces regular users, so this is the one path to
/// an admin credential.
pub async fn ensure_admin_user(pool: &DbPool, email: &str, password: &str) -> anyhow::Result<()> {
    let existing: Option<(String,)> = sqlx::query_as("SELECT id FROM users WHERE email = ?")
        .bind(email)
        .fetch_optional(pool)
        .await?;

    if existing.is_some() {
        return Ok(());
    }

    let id = Uuid::new_v4().to_string();
    let now = Utc::now().to_rfc3339();
    let password_hash =
        hash_password(password).map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?;

    sqlx::query(
        "INSERT INTO users (id, name, email, password_hash, role, is_active, created_at, updated_at) \
         VALUES (?, ?, ?, ?, 'admin', 1, ?, ?)",
    )
    .bind(&id)
    .bind("Administrator")
    .bind(email)
    .bind(&password_hash)
    .bind(&now)
    .bind(&now)
    .execute(pool)
    .await?;

    tracing::info!("Created admin user {}", email);
    Ok(())
}
