//! Page store error types.

/// Page store error.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Connection, query, or DDL failure.
    #[error("Storage error: {0}")]
    Storage(#[from] sqlx::Error),

    /// A page with this name already exists.
    #[error("Page already exists: {name}")]
    ConstraintViolation {
        /// Conflicting page name.
        name: String,
    },

    /// No page has this id.
    #[error("Page not found: id {id}")]
    NotFound {
        /// Requested page id.
        id: i64,
    },

    /// Failed to prepare the database directory.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    /// Map an insert failure, turning unique-constraint violations into
    /// [`StoreError::ConstraintViolation`].
    pub(crate) fn from_insert(err: sqlx::Error, name: &str) -> Self {
        match err {
            sqlx::Error::Database(db) if db.is_unique_violation() => Self::ConstraintViolation {
                name: name.to_owned(),
            },
            other => Self::Storage(other),
        }
    }
}
