//! DevHub Storage
//!
//! `SQLite` document store for DevHub.
//!
//! Each aggregate (user, profile, post) is one row. Nested collections are
//! kept inside the parent row as JSON documents and are only ever changed by
//! loading the aggregate, applying the core mutation model, and saving the
//! parent back.
//!
//! # Architecture
//!
//! - **Vertical Slicing**: Each aggregate owns its own queries
//! - **Versioned writes**: profiles and posts carry a write counter; a
//!   read-modify-write only lands on the version it read, so concurrent
//!   changes to the same document are retried instead of overwritten
//! - **Constraint-backed uniqueness**: email, handle and one-profile-per-user
//!   are UNIQUE columns; violations surface as `StorageError::Conflict`
//!
//! # Example
//!
//! ```rust,no_run
//! use devhub_storage::{create_pool, run_migrations, LocalStorageContext};
//! use devhub_core::Storage;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = create_pool("sqlite://devhub.db").await?;
//! run_migrations(&pool).await?;
//!
//! let storage = LocalStorageContext::new(pool);
//! let posts = storage.get_all_posts().await?;
//! # Ok(())
//! # }
//! ```

mod context;
mod error;

// Vertical slices
pub mod posts;
pub mod profiles;
pub mod users;

pub use context::LocalStorageContext;
pub use error::{Result, StorageError};

// Name used by the server
pub type Database = LocalStorageContext;

use sqlx::migrate::Migrator;
use sqlx::sqlite::SqlitePool;

/// Reads of a contended row before a read-modify-write gives up
pub(crate) const MAX_WRITE_ATTEMPTS: usize = 32;

// Embed migrations into binary
static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Run database migrations
///
/// This should be called once when the application starts to ensure
/// the database schema is up to date.
pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    MIGRATOR.run(pool).await?;
    Ok(())
}

/// Create a new `SQLite` pool
///
/// # Arguments
///
/// * `database_url` - `SQLite` connection string (e.g., `<sqlite://devhub.db>`)
pub async fn create_pool(database_url: &str) -> Result<SqlitePool> {
    use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
    use std::str::FromStr;

    tracing::debug!(database_url, "Creating SQLite pool");

    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(std::time::Duration::from_secs(30));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    tracing::info!("SQLite pool ready");

    Ok(pool)
}

/// Decode a JSON document column
pub(crate) fn from_json<T: serde::de::DeserializeOwned>(raw: &str) -> Result<T> {
    Ok(serde_json::from_str(raw)?)
}

/// Encode a JSON document column
pub(crate) fn to_json<T: serde::Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string(value)?)
}

/// Stored timestamps are Unix milliseconds
pub(crate) fn from_millis(millis: i64) -> Result<chrono::DateTime<chrono::Utc>> {
    chrono::DateTime::from_timestamp_millis(millis)
        .ok_or_else(|| StorageError::SerializationError(format!("Invalid timestamp: {}", millis)))
}
