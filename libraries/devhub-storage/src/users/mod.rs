//! User accounts and credentials

use crate::{from_millis, Result};
use devhub_core::types::{CreateUser, User, UserCredentials, UserId};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

fn user_from_row(row: &SqliteRow) -> Result<User> {
    Ok(User {
        id: UserId::new(row.try_get::<String, _>("id")?),
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        avatar: row.try_get("avatar")?,
        date: from_millis(row.try_get("date")?)?,
    })
}

/// Create a user. A taken email is rejected by the UNIQUE constraint.
pub async fn create(pool: &SqlitePool, user: CreateUser) -> Result<User> {
    let created = User {
        id: UserId::generate(),
        name: user.name,
        email: user.email,
        avatar: user.avatar,
        date: chrono::Utc::now(),
    };

    sqlx::query(
        r#"
        INSERT INTO users (id, name, email, avatar, password_hash, date)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(created.id.as_str())
    .bind(&created.name)
    .bind(&created.email)
    .bind(&created.avatar)
    .bind(&user.password_hash)
    .bind(created.date.timestamp_millis())
    .execute(pool)
    .await?;

    Ok(created)
}

/// Get user by ID
pub async fn get_by_id(pool: &SqlitePool, id: &UserId) -> Result<Option<User>> {
    let row = sqlx::query("SELECT id, name, email, avatar, date FROM users WHERE id = ?")
        .bind(id.as_str())
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(user_from_row).transpose()
}

/// Find a user with its password hash for login
pub async fn find_credentials_by_email(
    pool: &SqlitePool,
    email: &str,
) -> Result<Option<UserCredentials>> {
    let row = sqlx::query(
        "SELECT id, name, email, avatar, date, password_hash FROM users WHERE email = ?",
    )
    .bind(email)
    .fetch_optional(pool)
    .await?;

    row.map(|row| {
        Ok(UserCredentials {
            user: user_from_row(&row)?,
            password_hash: row.try_get("password_hash")?,
        })
    })
    .transpose()
}

/// Get all users
pub async fn get_all(pool: &SqlitePool) -> Result<Vec<User>> {
    let rows = sqlx::query("SELECT id, name, email, avatar, date FROM users ORDER BY name")
        .fetch_all(pool)
        .await?;

    rows.iter().map(user_from_row).collect()
}

/// Delete a user. Their profile goes with them (ON DELETE CASCADE); posts
/// stay.
pub async fn delete(pool: &SqlitePool, id: &UserId) -> Result<bool> {
    let result = sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(id.as_str())
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
