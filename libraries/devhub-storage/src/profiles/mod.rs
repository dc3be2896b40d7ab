//! Profiles with their experience and education documents

use crate::{from_json, from_millis, to_json, Result, StorageError, MAX_WRITE_ATTEMPTS};
use devhub_core::types::{Profile, ProfileId, UserId};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

const COLUMNS: &str = "id, user_id, handle, company, website, location, status, bio, \
                       github_username, skills, social, experience, education, date";

fn profile_from_row(row: &SqliteRow) -> Result<Profile> {
    Ok(Profile {
        id: ProfileId::new(row.try_get::<String, _>("id")?),
        user: UserId::new(row.try_get::<String, _>("user_id")?),
        handle: row.try_get("handle")?,
        company: row.try_get("company")?,
        website: row.try_get("website")?,
        location: row.try_get("location")?,
        status: row.try_get("status")?,
        bio: row.try_get("bio")?,
        github_username: row.try_get("github_username")?,
        skills: from_json(row.try_get("skills")?)?,
        social: from_json(row.try_get("social")?)?,
        experience: from_json(row.try_get("experience")?)?,
        education: from_json(row.try_get("education")?)?,
        date: from_millis(row.try_get("date")?)?,
    })
}

/// Find the profile owned by a user
pub async fn get_by_user(pool: &SqlitePool, user_id: &UserId) -> Result<Option<Profile>> {
    let row = sqlx::query(&format!("SELECT {} FROM profiles WHERE user_id = ?", COLUMNS))
        .bind(user_id.as_str())
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(profile_from_row).transpose()
}

/// Find a profile by handle
pub async fn get_by_handle(pool: &SqlitePool, handle: &str) -> Result<Option<Profile>> {
    let row = sqlx::query(&format!("SELECT {} FROM profiles WHERE handle = ?", COLUMNS))
        .bind(handle)
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(profile_from_row).transpose()
}

/// Get all profiles, oldest first
pub async fn get_all(pool: &SqlitePool) -> Result<Vec<Profile>> {
    let rows = sqlx::query(&format!("SELECT {} FROM profiles ORDER BY date", COLUMNS))
        .fetch_all(pool)
        .await?;

    rows.iter().map(profile_from_row).collect()
}

/// Insert a profile. A taken handle or a second profile for the same user is
/// rejected by the UNIQUE constraints.
pub async fn create(pool: &SqlitePool, profile: Profile) -> Result<Profile> {
    sqlx::query(&format!(
        "INSERT INTO profiles ({}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        COLUMNS
    ))
    .bind(profile.id.as_str())
    .bind(profile.user.as_str())
    .bind(&profile.handle)
    .bind(&profile.company)
    .bind(&profile.website)
    .bind(&profile.location)
    .bind(&profile.status)
    .bind(&profile.bio)
    .bind(&profile.github_username)
    .bind(to_json(&profile.skills)?)
    .bind(to_json(&profile.social)?)
    .bind(to_json(&profile.experience)?)
    .bind(to_json(&profile.education)?)
    .bind(profile.date.timestamp_millis())
    .execute(pool)
    .await?;

    tracing::debug!(profile_id = %profile.id, handle = %profile.handle, "Profile created");

    Ok(profile)
}

/// Load the profile owned by `user_id`, apply `change` and write the result
/// back.
///
/// `change` reports whether it modified the profile; when it returns `false`
/// nothing is written. The write only lands if the row was not updated since
/// it was read, otherwise the profile is reloaded and `change` runs again.
/// Returns `None` when the user has no profile.
pub async fn modify(
    pool: &SqlitePool,
    user_id: &UserId,
    change: &mut (dyn FnMut(&mut Profile) -> bool + Send),
) -> Result<Option<Profile>> {
    for _ in 0..MAX_WRITE_ATTEMPTS {
        let row = sqlx::query(&format!(
            "SELECT {}, version FROM profiles WHERE user_id = ?",
            COLUMNS
        ))
        .bind(user_id.as_str())
        .fetch_optional(pool)
        .await?;
        let Some(row) = row else {
            return Ok(None);
        };

        let version: i64 = row.try_get("version")?;
        let mut profile = profile_from_row(&row)?;
        if !change(&mut profile) {
            return Ok(Some(profile));
        }

        if write_if_unchanged(pool, &profile, version).await? {
            return Ok(Some(profile));
        }
        tracing::debug!(user_id = %user_id, version, "Profile changed while modifying, retrying");
    }

    Err(StorageError::contention("Profile", user_id.as_str()))
}

async fn write_if_unchanged(pool: &SqlitePool, profile: &Profile, version: i64) -> Result<bool> {
    let result = sqlx::query(
        r#"
        UPDATE profiles
        SET handle = ?, company = ?, website = ?, location = ?, status = ?, bio = ?,
            github_username = ?, skills = ?, social = ?, experience = ?, education = ?,
            version = version + 1
        WHERE id = ? AND version = ?
        "#,
    )
    .bind(&profile.handle)
    .bind(&profile.company)
    .bind(&profile.website)
    .bind(&profile.location)
    .bind(&profile.status)
    .bind(&profile.bio)
    .bind(&profile.github_username)
    .bind(to_json(&profile.skills)?)
    .bind(to_json(&profile.social)?)
    .bind(to_json(&profile.experience)?)
    .bind(to_json(&profile.education)?)
    .bind(profile.id.as_str())
    .bind(version)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() == 1)
}

/// Delete the profile owned by a user
pub async fn delete_by_user(pool: &SqlitePool, user_id: &UserId) -> Result<bool> {
    let result = sqlx::query("DELETE FROM profiles WHERE user_id = ?")
        .bind(user_id.as_str())
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
