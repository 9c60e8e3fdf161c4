//! Issued-token registry
//!
//! Bearer tokens are JWTs, but logout must invalidate a single token before
//! its signature expires. Every issued token's `jti` is recorded here;
//! resolution requires the row to still exist.

use crate::error::Result;
use chorus_core::types::UserId;
use sqlx::{Row, SqlitePool};

/// Record a newly issued token
pub async fn insert(pool: &SqlitePool, jti: &str, user_id: UserId) -> Result<()> {
    sqlx::query("INSERT INTO auth_tokens (jti, user_id) VALUES (?, ?)")
        .bind(jti)
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(())
}

/// Whether a token id is still live (issued and not revoked)
pub async fn is_live(pool: &SqlitePool, jti: &str) -> Result<bool> {
    let row = sqlx::query("SELECT COUNT(*) as count FROM auth_tokens WHERE jti = ?")
        .bind(jti)
        .fetch_one(pool)
        .await?;

    Ok(row.get::<i64, _>("count") > 0)
}

/// Revoke a single token. Revoking an unknown `jti` is a no-op.
pub async fn revoke(pool: &SqlitePool, jti: &str) -> Result<()> {
    sqlx::query("DELETE FROM auth_tokens WHERE jti = ?")
        .bind(jti)
        .execute(pool)
        .await?;

    Ok(())
}
