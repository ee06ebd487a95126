//! Record store access
//!
//! The engine consumes the subject database through the `RecordStore`
//! trait: read the whole population, read one document, merge fields into
//! one document. The concrete implementation keeps one row per subject with
//! the full document as JSON, so upstream fields the engine knows nothing
//! about survive updates untouched.

use crate::error::{Error, Result};
use crate::models::Subject;
use async_trait::async_trait;
use serde_json::{Map, Value};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

/// Subject database operations the engine depends on.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Load the full subject population, in stable insertion order.
    async fn get_all(&self) -> Result<Vec<Subject>>;

    /// Load one subject document.
    async fn get_one(&self, id: &str) -> Result<Option<Subject>>;

    /// Merge the given fields into one subject document.
    ///
    /// Fails with [`Error::NotFound`] if the document is gone.
    async fn update_fields(&self, id: &str, fields: Map<String, Value>) -> Result<()>;
}

/// SQLite-backed document store: one row per subject, document as JSON.
pub struct SqliteRecordStore {
    pool: SqlitePool,
}

impl SqliteRecordStore {
    /// Open (or create) the database at `path` and ensure the schema exists.
    pub async fn open(path: &str) -> Result<Self> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);

        // Single connection: the engine is strictly sequential, and an
        // in-memory database must not be split across pool connections.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;

        let store = Self { pool };
        store.init_schema().await?;
        Ok(store)
    }

    pub fn with_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn init_schema(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS players (
                id TEXT PRIMARY KEY,
                document TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Insert or replace one subject document.
    pub async fn upsert(&self, subject: &Subject) -> Result<()> {
        let document = serde_json::to_string(&subject.fields)?;
        sqlx::query("INSERT OR REPLACE INTO players (id, document) VALUES (?, ?)")
            .bind(&subject.id)
            .bind(document)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    fn parse_row(id: String, document: String) -> Result<Subject> {
        let fields: Map<String, Value> = serde_json::from_str(&document)?;
        Ok(Subject::new(id, fields))
    }
}

#[async_trait]
impl RecordStore for SqliteRecordStore {
    async fn get_all(&self) -> Result<Vec<Subject>> {
        let rows = sqlx::query_as::<_, (String, String)>(
            "SELECT id, document FROM players ORDER BY rowid",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|(id, document)| Self::parse_row(id, document))
            .collect()
    }

    async fn get_one(&self, id: &str) -> Result<Option<Subject>> {
        let row = sqlx::query_as::<_, (String, String)>(
            "SELECT id, document FROM players WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|(id, document)| Self::parse_row(id, document))
            .transpose()
    }

    async fn update_fields(&self, id: &str, fields: Map<String, Value>) -> Result<()> {
        let existing = self
            .get_one(id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("player {id}")))?;

        let mut document = existing.fields;
        for (key, value) in fields {
            document.insert(key, value);
        }

        let serialized = serde_json::to_string(&document)?;
        let result = sqlx::query("UPDATE players SET document = ? WHERE id = ?")
            .bind(serialized)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound(format!("player {id}")));
        }
        Ok(())
    }
}
