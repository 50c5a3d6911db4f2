use axum::{extract::Extension, Json};
use serde::{Deserialize, Serialize};

use crate::common::ApiError;
use crate::domains::auth::{hash_password, verify_password, User};
use crate::server::app::AppState;
use crate::server::middleware::AuthUser;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

pub async fn register_handler(
    Extension(state): Extension<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let name = payload.name.trim();
    let email = payload.email.trim().to_lowercase();
    if name.is_empty() {
        return Err(ApiError::BadRequest("name is required".to_string()));
    }
    if !email.contains('@') {
        return Err(ApiError::BadRequest("invalid email".to_string()));
    }
    if payload.password.len() < 6 {
        return Err(ApiError::BadRequest(
            "password must be at least 6 characters".to_string(),
        ));
    }

    if User::find_by_email(&email, &state.db_pool).await?.is_some() {
        return Err(ApiError::Conflict("email already registered".to_string()));
    }

    let user = User::create(name, &email, &hash_password(&payload.password), &state.db_pool).await?;
    let token = state
        .jwt_service
        .create_token(user.id, user.email.clone(), user.is_admin)?;

    Ok(Json(AuthResponse { token, user }))
}

pub async fn login_handler(
    Extension(state): Extension<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let email = payload.email.trim().to_lowercase();

    // Same error for unknown email and wrong password.
    let user = User::find_by_email(&email, &state.db_pool)
        .await?
        .ok_or(ApiError::Unauthorized)?;
    if !verify_password(&payload.password, &user.password_hash) {
        return Err(ApiError::Unauthorized);
    }

    let token = state
        .jwt_service
        .create_token(user.id, user.email.clone(), user.is_admin)?;

    Ok(Json(AuthResponse { token, user }))
}

pub async fn me_handler(
    Extension(state): Extension<AppState>,
    auth_user: Option<Extension<AuthUser>>,
) -> Result<Json<User>, ApiError> {
    let Extension(auth_user) = auth_user.ok_or(ApiError::Unauthorized)?;
    let user = User::find_by_id(auth_user.user_id, &state.db_pool)
        .await?
        .ok_or(ApiError::NotFound("user"))?;
    Ok(Json(user))
}
