//! Posts with their likes and comments

use crate::{from_json, from_millis, to_json, Result, StorageError, MAX_WRITE_ATTEMPTS};
use devhub_core::types::{Post, PostId, UserId};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

const COLUMNS: &str = "id, user_id, text, name, avatar, likes, comments, date";

fn post_from_row(row: &SqliteRow) -> Result<Post> {
    Ok(Post {
        id: PostId::new(row.try_get::<String, _>("id")?),
        user: UserId::new(row.try_get::<String, _>("user_id")?),
        text: row.try_get("text")?,
        name: row.try_get("name")?,
        avatar: row.try_get("avatar")?,
        likes: from_json(row.try_get("likes")?)?,
        comments: from_json(row.try_get("comments")?)?,
        date: from_millis(row.try_get("date")?)?,
    })
}

/// Insert a new post
pub async fn create(pool: &SqlitePool, post: Post) -> Result<Post> {
    sqlx::query(
        r#"
        INSERT INTO posts (id, user_id, text, name, avatar, likes, comments, date)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(post.id.as_str())
    .bind(post.user.as_str())
    .bind(&post.text)
    .bind(&post.name)
    .bind(&post.avatar)
    .bind(to_json(&post.likes)?)
    .bind(to_json(&post.comments)?)
    .bind(post.date.timestamp_millis())
    .execute(pool)
    .await?;

    tracing::debug!(post_id = %post.id, user_id = %post.user, "Post created");

    Ok(post)
}

/// Get post by ID
pub async fn get_by_id(pool: &SqlitePool, id: &PostId) -> Result<Option<Post>> {
    let row = sqlx::query(&format!("SELECT {} FROM posts WHERE id = ?", COLUMNS))
        .bind(id.as_str())
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(post_from_row).transpose()
}

/// Get all posts, newest first. Posts created in the same millisecond keep
/// reverse insertion order.
pub async fn get_all(pool: &SqlitePool) -> Result<Vec<Post>> {
    let rows = sqlx::query(&format!(
        "SELECT {} FROM posts ORDER BY date DESC, rowid DESC",
        COLUMNS
    ))
    .fetch_all(pool)
    .await?;

    rows.iter().map(post_from_row).collect()
}

/// Load a post, apply `change` and write the result back.
///
/// `change` reports whether it modified the post; when it returns `false`
/// nothing is written. The write only lands if the row was not updated since
/// it was read, otherwise the post is reloaded and `change` runs again.
/// Returns `None` when there is no such post.
pub async fn modify(
    pool: &SqlitePool,
    id: &PostId,
    change: &mut (dyn FnMut(&mut Post) -> bool + Send),
) -> Result<Option<Post>> {
    for _ in 0..MAX_WRITE_ATTEMPTS {
        let row = sqlx::query(&format!("SELECT {}, version FROM posts WHERE id = ?", COLUMNS))
            .bind(id.as_str())
            .fetch_optional(pool)
            .await?;
        let Some(row) = row else {
            return Ok(None);
        };

        let version: i64 = row.try_get("version")?;
        let mut post = post_from_row(&row)?;
        if !change(&mut post) {
            return Ok(Some(post));
        }

        if write_if_unchanged(pool, &post, version).await? {
            return Ok(Some(post));
        }
        tracing::debug!(post_id = %id, version, "Post changed while modifying, retrying");
    }

    Err(StorageError::contention("Post", id.as_str()))
}

async fn write_if_unchanged(pool: &SqlitePool, post: &Post, version: i64) -> Result<bool> {
    let result = sqlx::query(
        r#"
        UPDATE posts
        SET text = ?, likes = ?, comments = ?, version = version + 1
        WHERE id = ? AND version = ?
        "#,
    )
    .bind(&post.text)
    .bind(to_json(&post.likes)?)
    .bind(to_json(&post.comments)?)
    .bind(post.id.as_str())
    .bind(version)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() == 1)
}

/// Delete a post
pub async fn delete(pool: &SqlitePool, id: &PostId) -> Result<bool> {
    let result = sqlx::query("DELETE FROM posts WHERE id = ?")
        .bind(id.as_str())
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
