use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::{hash_password, verify_password, AuthUser};
use crate::models::user::{Role, User, UserProfile};
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::response::{created, success};

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Option<Role>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub profile_photo: Option<String>,
}

/// Token plus the public user record, returned by register and login.
#[derive(Debug, Serialize)]
pub struct AuthPayload {
    pub access_token: String,
    pub user: UserProfile,
}

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<Response, AppError> {
    let name = req.name.trim();
    let email = req.email.trim();
    if name.is_empty() || email.is_empty() || req.password.is_empty() {
        return Err(AppError::ValidationError(
            "Name, email and password are required".to_string(),
        ));
    }

    let role = req.role.unwrap_or(Role::Student);
    let password_hash = hash_password(&req.password)?;

    let user = sqlx::query_as::<_, User>(
        "INSERT INTO users (id, name, email, password_hash, role) \
         VALUES ($1, $2, $3, $4, $5) RETURNING *",
    )
    .bind(Uuid::new_v4())
    .bind(name)
    .bind(email)
    .bind(&password_hash)
    .bind(role)
    .fetch_one(&state.pool)
    .await
    .map_err(|e| AppError::conflict_or_db(e, "Email already registered"))?;

    let access_token = state.auth.issue(user.id, user.role)?;
    tracing::info!(user_id = %user.id, role = ?user.role, "User registered");

    let payload = AuthPayload {
        access_token,
        user: user.into(),
    };
    Ok(created(payload, "User registered successfully").into_response())
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Response, AppError> {
    // Same error for unknown email and wrong password.
    let invalid = || AppError::AuthError("Invalid email or password".to_string());

    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
        .bind(req.email.trim())
        .fetch_optional(&state.pool)
        .await?
        .ok_or_else(invalid)?;

    if !verify_password(&req.password, &user.password_hash)? {
        return Err(invalid());
    }

    let access_token = state.auth.issue(user.id, user.role)?;
    tracing::info!(user_id = %user.id, "User logged in");

    let payload = AuthPayload {
        access_token,
        user: user.into(),
    };
    Ok(success(payload, "Login successful").into_response())
}

pub async fn get_profile(
    auth: AuthUser,
    State(state): State<AppState>,
) -> Result<Response, AppError> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(auth.id)
        .fetch_optional(&state.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(success(UserProfile::from(user), "Profile fetched successfully").into_response())
}

pub async fn update_profile(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Response, AppError> {
    if let Some(name) = &req.name {
        if name.trim().is_empty() {
            return Err(AppError::ValidationError("Name cannot be empty".to_string()));
        }
    }

    // Email and role are immutable here; only display fields change.
    let user = sqlx::query_as::<_, User>(
        "UPDATE users SET name = COALESCE($2, name), \
         profile_photo = COALESCE($3, profile_photo), updated_at = now() \
         WHERE id = $1 RETURNING *",
    )
    .bind(auth.id)
    .bind(req.name.as_deref().map(str::trim))
    .bind(&req.profile_photo)
    .fetch_optional(&state.pool)
    .await?
    .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(success(UserProfile::from(user), "Profile updated successfully").into_response())
}
