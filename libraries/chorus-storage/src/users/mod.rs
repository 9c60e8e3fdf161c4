//! User account and credential queries

use crate::error::{Result, StorageError};
use chorus_core::types::{Role, User, UserId};
use sqlx::{Row, SqlitePool};

/// Create a user together with its credentials.
///
/// The two inserts run in one transaction so an account can never exist
/// without a password hash. A taken email surfaces as
/// [`StorageError::Duplicate`] naming `email`.
pub async fn create(
    pool: &SqlitePool,
    name: &str,
    email: &str,
    role: Role,
    password_hash: &str,
) -> Result<User> {
    let mut tx = pool.begin().await?;

    let result = sqlx::query("INSERT INTO users (name, email, role) VALUES (?, ?, ?)")
        .bind(name)
        .bind(email)
        .bind(role.as_str())
        .execute(&mut *tx)
        .await
        .map_err(|e| StorageError::on_unique(e, "email"))?;

    let id = UserId::new(result.last_insert_rowid());

    sqlx::query("INSERT INTO user_credentials (user_id, password_hash) VALUES (?, ?)")
        .bind(id)
        .bind(password_hash)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    get_by_id(pool, id)
        .await?
        .ok_or_else(|| StorageError::not_found("user", id))
}

/// Get user by ID
pub async fn get_by_id(pool: &SqlitePool, id: UserId) -> Result<Option<User>> {
    let row = sqlx::query(
        "SELECT id, name, email, role, created_at FROM users WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|row| user_from_row(&row)))
}

/// Look up a user by email address
pub async fn find_by_email(pool: &SqlitePool, email: &str) -> Result<Option<User>> {
    let row = sqlx::query(
        "SELECT id, name, email, role, created_at FROM users WHERE email = ?",
    )
    .bind(email)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|row| user_from_row(&row)))
}

/// Get user's password hash for authentication
///
/// Returns the password hash if found, or None if the user has no credentials
pub async fn get_password_hash(pool: &SqlitePool, user_id: UserId) -> Result<Option<String>> {
    let row = sqlx::query("SELECT password_hash FROM user_credentials WHERE user_id = ?")
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

    Ok(row.map(|r| r.get("password_hash")))
}

/// Get all users, ordered by name
pub async fn get_all(pool: &SqlitePool) -> Result<Vec<User>> {
    let rows = sqlx::query("SELECT id, name, email, role, created_at FROM users ORDER BY name")
        .fetch_all(pool)
        .await?;

    Ok(rows.iter().map(user_from_row).collect())
}

fn user_from_row(row: &sqlx::sqlite::SqliteRow) -> User {
    let role: String = row.get("role");

    User {
        id: row.get("id"),
        name: row.get("name"),
        email: row.get("email"),
        role: Role::parse(&role).unwrap_or(Role::User),
        created_at: row.get("created_at"),
    }
}
