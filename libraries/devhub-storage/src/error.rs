/// Storage-specific errors
use thiserror::Error;

/// Result type alias using `StorageError`
pub type Result<T> = std::result::Result<T, StorageError>;

/// Storage error types
#[derive(Error, Debug)]
pub enum StorageError {
    /// Entity not found
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// A UNIQUE constraint rejected the write
    #[error("Unique constraint violated on {table}.{column}")]
    Conflict { table: String, column: String },

    /// A read-modify-write kept losing to concurrent writers
    #[error("{entity} {id} is being modified concurrently")]
    Contention { entity: String, id: String },

    /// Serialization/deserialization error for a stored document column
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Migration error
    #[error(transparent)]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Database error from `SQLx`
    #[error(transparent)]
    Database(sqlx::Error),
}

impl StorageError {
    /// Create a not found error
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    pub fn contention(entity: impl Into<String>, id: impl Into<String>) -> Self {
        Self::Contention {
            entity: entity.into(),
            id: id.into(),
        }
    }
}

impl From<sqlx::Error> for StorageError {
    /// Unique violations become `Conflict`, naming the offending column.
    fn from(err: sqlx::Error) -> Self {
        if let Some(db_err) = err.as_database_error() {
            if db_err.is_unique_violation() {
                // SQLite reports "UNIQUE constraint failed: <table>.<column>"
                if let Some((table, column)) = db_err
                    .message()
                    .rsplit(": ")
                    .next()
                    .and_then(|target| target.split_once('.'))
                {
                    return Self::Conflict {
                        table: table.to_string(),
                        column: column.to_string(),
                    };
                }
            }
        }
        Self::Database(err)
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}

impl From<StorageError> for devhub_core::HubError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound { entity, id } => Self::NotFound { entity, id },
            StorageError::Conflict { table, column } => Self::Conflict {
                entity: entity_name(&table).to_string(),
                field: column_field(&column).to_string(),
            },
            StorageError::Database(e) => Self::Database(e.to_string()),
            other => Self::storage(other.to_string()),
        }
    }
}

fn entity_name(table: &str) -> &str {
    match table {
        "users" => "User",
        "profiles" => "Profile",
        "posts" => "Post",
        other => other,
    }
}

/// Map a column to the request field it was populated from
fn column_field(column: &str) -> &str {
    match column {
        "user_id" => "user",
        other => other,
    }
}
