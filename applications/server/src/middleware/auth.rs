//! Authentication extractors
//!
//! Protected handlers take [`AuthenticatedUser`] and reject with 401 when no
//! valid bearer token is presented. Public handlers whose behavior depends
//! on who is asking (playlist visibility) take [`OptionalUser`] instead,
//! which degrades to anonymous on any resolution failure.
use crate::{error::ServerError, state::AppState};
use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};
use chorus_core::policy::Actor;
use chorus_core::types::User;

/// The authenticated user behind the request's bearer token
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub User);

impl AuthenticatedUser {
    pub fn user(&self) -> &User {
        &self.0
    }

    /// The policy-facing identity of this user
    pub fn actor(&self) -> Actor {
        Actor::from(&self.0)
    }
}

/// The request's user when a valid bearer token was presented, otherwise
/// anonymous
#[derive(Debug, Clone, Default)]
pub struct OptionalUser(pub Option<User>);

impl OptionalUser {
    /// The policy-facing identity of this request
    pub fn actor(&self) -> Actor {
        match &self.0 {
            Some(user) => Actor::from(user),
            None => Actor::Anonymous,
        }
    }
}

/// Pull the bearer token out of the Authorization header
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
}

/// Resolve the Authorization header to a user row.
///
/// `Ok(None)` means no token was presented; an invalid or revoked token, or
/// a token whose user row is gone, is an error.
async fn resolve_bearer(state: &AppState, headers: &HeaderMap) -> Result<Option<User>, ServerError> {
    let Some(token) = bearer_token(headers) else {
        return Ok(None);
    };

    let user_id = state.auth.resolve(&state.pool, token).await.map_err(|e| {
        tracing::warn!("Token verification failed: {}", e);
        ServerError::Auth("Unauthenticated.".to_string())
    })?;

    let user = chorus_storage::users::get_by_id(&state.pool, user_id)
        .await?
        .ok_or_else(|| ServerError::Auth("Unauthenticated.".to_string()))?;

    Ok(Some(user))
}

#[axum::async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = ServerError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match resolve_bearer(state, &parts.headers).await? {
            Some(user) => Ok(AuthenticatedUser(user)),
            None => Err(ServerError::Auth("Unauthenticated.".to_string())),
        }
    }
}

#[axum::async_trait]
impl FromRequestParts<AppState> for OptionalUser {
    type Rejection = ServerError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // A bad token on a public route reads as anonymous, not as a 401
        Ok(OptionalUser(
            resolve_bearer(state, &parts.headers).await.unwrap_or(None),
        ))
    }
}
