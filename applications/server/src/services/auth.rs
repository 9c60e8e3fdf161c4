//! Authentication service - JWT and password handling
//!
//! Tokens are HS256 JWTs whose `jti` is also recorded in the database at
//! issue time. Resolution checks both the signature and the registry row, so
//! logout can kill a single token before its `exp` arrives.
use crate::error::{Result, ServerError};
use chorus_core::types::UserId;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct AuthService {
    secret: String,
    token_expiration: Duration,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // Subject (user ID)
    pub jti: String, // Token ID, must be live in the registry
    pub exp: i64,    // Expiration time
    pub iat: i64,    // Issued at
}

impl AuthService {
    pub fn new(secret: String, expiration_hours: u64) -> Self {
        Self {
            secret,
            token_expiration: Duration::hours(expiration_hours as i64),
        }
    }

    /// Hash a password using bcrypt
    pub fn hash_password(&self, password: &str) -> Result<String> {
        bcrypt::hash(password, bcrypt::DEFAULT_COST).map_err(ServerError::from)
    }

    /// Verify a password against a hash
    pub fn verify_password(&self, password: &str, hash: &str) -> Result<bool> {
        bcrypt::verify(password, hash).map_err(ServerError::from)
    }

    /// Issue a bearer token for a user and record it in the registry
    pub async fn issue(&self, pool: &SqlitePool, user_id: UserId) -> Result<String> {
        let (token, jti) = self.create_token(user_id)?;
        chorus_storage::tokens::insert(pool, &jti, user_id).await?;
        Ok(token)
    }

    /// Resolve a bearer token to a user ID.
    ///
    /// Fails when the signature is invalid, the token is expired, or the
    /// token has been revoked.
    pub async fn resolve(&self, pool: &SqlitePool, token: &str) -> Result<UserId> {
        let claims = self.verify_token(token)?;

        if !chorus_storage::tokens::is_live(pool, &claims.jti).await? {
            return Err(ServerError::Auth("Token has been revoked".to_string()));
        }

        claims
            .sub
            .parse::<i64>()
            .map(UserId::new)
            .map_err(|_| ServerError::Auth("Invalid token subject".to_string()))
    }

    /// Revoke a single token. The signature must still verify; revoking an
    /// already-revoked token is a no-op.
    pub async fn revoke(&self, pool: &SqlitePool, token: &str) -> Result<()> {
        let claims = self.verify_token(token)?;
        chorus_storage::tokens::revoke(pool, &claims.jti).await?;
        Ok(())
    }

    /// Sign a token for a user; returns the token and its `jti`
    pub fn create_token(&self, user_id: UserId) -> Result<(String, String)> {
        let now = Utc::now();
        let exp = now + self.token_expiration;
        let jti = Uuid::new_v4().to_string();

        let claims = Claims {
            sub: user_id.as_i64().to_string(),
            jti: jti.clone(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
        };

        let encoding_key = EncodingKey::from_secret(self.secret.as_bytes());
        let token = encode(&Header::default(), &claims, &encoding_key)?;

        Ok((token, jti))
    }

    /// Verify and decode a token
    pub fn verify_token(&self, token: &str) -> Result<Claims> {
        let decoding_key = DecodingKey::from_secret(self.secret.as_bytes());
        let validation = Validation::default();

        let token_data = decode::<Claims>(token, &decoding_key, &validation)?;
        Ok(token_data.claims)
    }
}
