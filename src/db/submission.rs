//! Submission store: form payloads kept verbatim as JSON text

use serde_json::Value;
use sqlx::SqlitePool;
use std::path::Path;

use super::StoreError;

#[derive(Clone)]
pub struct SubmissionStore {
    pool: SqlitePool,
}

impl SubmissionStore {
    pub async fn open(path: &Path) -> Result<Self, StoreError> {
        let store = Self::from_pool(super::connect(path).await?);
        store.migrate().await?;
        Ok(store)
    }

    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn migrate(&self) -> Result<(), StoreError> {
        // AUTOINCREMENT keeps ids of deleted rows from being handed out again
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS submissions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                data TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Store a form payload as-is and return its newly allocated id.
    pub async fn insert(&self, form: &Value) -> Result<i64, StoreError> {
        let data = serde_json::to_string(form)?;
        let result = sqlx::query("INSERT INTO submissions (data) VALUES (?)")
            .bind(data)
            .execute(&self.pool)
            .await?;
        Ok(result.last_insert_rowid())
    }

    /// Raw JSON text of a submission.
    pub async fn get_raw(&self, id: i64) -> Result<Option<String>, StoreError> {
        let data = sqlx::query_scalar::<_, String>("SELECT data FROM submissions WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(data)
    }

    /// Fetch and parse a submission; `Ok(None)` when no row has this id.
    pub async fn get(&self, id: i64) -> Result<Option<Value>, StoreError> {
        match self.get_raw(id).await? {
            Some(data) => Ok(Some(serde_json::from_str(&data)?)),
            None => Ok(None),
        }
    }
}
