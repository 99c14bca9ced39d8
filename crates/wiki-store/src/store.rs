//! Pool-backed page store.

use std::path::Path;
use std::time::Duration;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};

use crate::error::StoreError;

const SQL_CREATE_PAGES_TABLE: &str = "CREATE TABLE IF NOT EXISTS Pages (\
     Id INTEGER PRIMARY KEY AUTOINCREMENT, \
     Name VARCHAR(255) NOT NULL UNIQUE, \
     Content TEXT NOT NULL)";
const SQL_GET_PAGE: &str = "SELECT Id, Content FROM Pages WHERE Name = ?";
const SQL_CREATE_PAGE: &str = "INSERT INTO Pages (Name, Content) VALUES (?, ?)";
const SQL_SAVE_PAGE: &str = "UPDATE Pages SET Content = ? WHERE Id = ?";
const SQL_ALL_PAGES: &str = "SELECT Name FROM Pages ORDER BY Name ASC";
const SQL_DELETE_PAGE: &str = "DELETE FROM Pages WHERE Id = ?";

/// How long a connection waits on a locked database before failing.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// A stored page row, as returned by [`PageStore::get_by_name`].
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct StoredPage {
    /// Row id.
    #[sqlx(rename = "Id")]
    pub id: i64,
    /// Raw Markdown content.
    #[sqlx(rename = "Content")]
    pub content: String,
}

/// Page store over a shared SQLite connection pool.
///
/// Cloning is cheap and shares the underlying pool.
#[derive(Debug, Clone)]
pub struct PageStore {
    pool: SqlitePool,
}

impl PageStore {
    /// Open the database at `path`, creating the file and its parent
    /// directory if missing.
    ///
    /// The pool holds at most `pool_size` connections.
    pub async fn connect(path: impl AsRef<Path>, pool_size: u32) -> Result<Self, StoreError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(BUSY_TIMEOUT);

        let pool = SqlitePoolOptions::new()
            .max_connections(pool_size)
            .connect_with(options)
            .await?;

        tracing::info!(path = %path.display(), pool_size, "Opened page database");

        Ok(Self::from_pool(pool))
    }

    /// Wrap an existing pool.
    #[must_use]
    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create the `Pages` table if it does not exist.
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(SQL_CREATE_PAGES_TABLE)
            .execute(&self.pool)
            .await?;
        tracing::info!("Page schema ready");
        Ok(())
    }

    /// All page names in ascending order.
    pub async fn list_names(&self) -> Result<Vec<String>, StoreError> {
        let names: Vec<String> = sqlx::query_scalar(SQL_ALL_PAGES)
            .fetch_all(&self.pool)
            .await?;
        Ok(names)
    }

    /// Look up a page by name. `None` means no such page exists yet.
    pub async fn get_by_name(&self, name: &str) -> Result<Option<StoredPage>, StoreError> {
        tracing::debug!(name, "Fetching page");
        let page: Option<StoredPage> = sqlx::query_as(SQL_GET_PAGE)
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;
        Ok(page)
    }

    /// Insert a new page and return its id.
    ///
    /// Fails with [`StoreError::ConstraintViolation`] if `name` is taken.
    pub async fn insert(&self, name: &str, content: &str) -> Result<i64, StoreError> {
        let result = sqlx::query(SQL_CREATE_PAGE)
            .bind(name)
            .bind(content)
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::from_insert(e, name))?;

        let id = result.last_insert_rowid();
        tracing::debug!(name, id, "Inserted page");
        Ok(id)
    }

    /// Replace the content of the page with `id`.
    ///
    /// Fails with [`StoreError::NotFound`] if no row has that id.
    pub async fn update_by_id(&self, id: i64, content: &str) -> Result<(), StoreError> {
        let result = sqlx::query(SQL_SAVE_PAGE)
            .bind(content)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound { id });
        }
        tracing::debug!(id, "Updated page");
        Ok(())
    }

    /// Delete the page with `id`. Deleting a missing id succeeds.
    pub async fn delete_by_id(&self, id: i64) -> Result<(), StoreError> {
        let result = sqlx::query(SQL_DELETE_PAGE)
            .bind(id)
            .execute(&self.pool)
            .await?;
        tracing::debug!(id, deleted = result.rows_affected(), "Deleted page");
        Ok(())
    }

    /// Close the pool, waiting for checked-out connections to return.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}
