//! Authentication API routes
use crate::{
    api::MessageResponse,
    error::{Result, ServerError},
    middleware::{bearer_token, AuthenticatedUser},
    state::AppState,
    validation::{self, ValidationErrors},
};
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    Json,
};
use chorus_core::types::{Role, User};
use serde::{Deserialize, Serialize};

/// One message for both unknown email and wrong password, so responses never
/// reveal which one it was
const INVALID_CREDENTIALS: &str = "The provided credentials are incorrect.";

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub password_confirmation: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub message: String,
    pub user: User,
    pub token: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user: User,
    pub token: String,
}

/// POST /api/register
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>)> {
    let mut errors = ValidationErrors::new();
    validation::required_string(&mut errors, "name", req.name.as_deref(), 1, 255);
    validation::required_email(&mut errors, "email", req.email.as_deref(), 255);
    validation::required_confirmed(
        &mut errors,
        "password",
        req.password.as_deref(),
        req.password_confirmation.as_deref(),
        8,
    );
    errors.into_result()?;

    let (Some(name), Some(email), Some(password)) = (req.name, req.email, req.password) else {
        return Err(ServerError::Internal("validated field missing".to_string()));
    };

    let password_hash = state.auth.hash_password(&password)?;

    // A taken email comes back as a Duplicate and surfaces as a 422
    let user =
        chorus_storage::users::create(&state.pool, &name, &email, Role::User, &password_hash)
            .await?;

    let token = state.auth.issue(&state.pool, user.id).await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "User created successfully".to_string(),
            user,
            token,
        }),
    ))
}

/// POST /api/login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    let mut errors = ValidationErrors::new();
    validation::required_email(&mut errors, "email", req.email.as_deref(), 255);
    if req.password.as_deref().map_or(true, str::is_empty) {
        errors.add("password", "The password field is required.");
    }
    errors.into_result()?;

    let (Some(email), Some(password)) = (req.email, req.password) else {
        return Err(ServerError::Internal("validated field missing".to_string()));
    };

    let user = chorus_storage::users::find_by_email(&state.pool, &email)
        .await?
        .ok_or_else(|| ServerError::Auth(INVALID_CREDENTIALS.to_string()))?;

    let password_hash = chorus_storage::users::get_password_hash(&state.pool, user.id)
        .await?
        .ok_or_else(|| ServerError::Auth(INVALID_CREDENTIALS.to_string()))?;

    if !state.auth.verify_password(&password, &password_hash)? {
        return Err(ServerError::Auth(INVALID_CREDENTIALS.to_string()));
    }

    let token = state.auth.issue(&state.pool, user.id).await?;

    Ok(Json(LoginResponse { user, token }))
}

/// POST /api/logout
///
/// Revokes exactly the token the request was made with.
pub async fn logout(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    headers: HeaderMap,
) -> Result<Json<MessageResponse>> {
    let token = bearer_token(&headers)
        .ok_or_else(|| ServerError::Auth("Unauthenticated.".to_string()))?;

    state.auth.revoke(&state.pool, token).await?;

    Ok(Json(MessageResponse::new("Logged out successfully")))
}

/// GET /api/user
pub async fn current_user(user: AuthenticatedUser) -> Json<User> {
    Json(user.0)
}
