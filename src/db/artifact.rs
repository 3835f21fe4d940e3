//! Artifact store: metadata of generated certificate files

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use std::path::Path;

use super::{StoreError, SubmissionStore};
use crate::certificate::models::{Artifact, ArtifactListing};

#[derive(Clone)]
pub struct ArtifactStore {
    pool: SqlitePool,
}

impl ArtifactStore {
    pub async fn open(path: &Path) -> Result<Self, StoreError> {
        let store = Self::from_pool(super::connect(path).await?);
        store.migrate().await?;
        Ok(store)
    }

    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS pdfs (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                submission_id INTEGER NOT NULL,
                file_path TEXT NOT NULL,
                file_name TEXT NOT NULL,
                created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
            "#,
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Record a freshly generated file, stamped with the current time.
    pub async fn insert(
        &self,
        submission_id: i64,
        file_path: &str,
        file_name: &str,
    ) -> Result<i64, StoreError> {
        self.insert_at(submission_id, file_path, file_name, Utc::now())
            .await
    }

    pub async fn insert_at(
        &self,
        submission_id: i64,
        file_path: &str,
        file_name: &str,
        created_at: DateTime<Utc>,
    ) -> Result<i64, StoreError> {
        let result = sqlx::query(
            "INSERT INTO pdfs (submission_id, file_path, file_name, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(submission_id)
        .bind(file_path)
        .bind(file_name)
        .bind(created_at)
        .execute(&self.pool)
        .await?;
        Ok(result.last_insert_rowid())
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Option<Artifact>, StoreError> {
        let artifact = sqlx::query_as::<_, Artifact>(
            "SELECT id, submission_id, file_path, file_name, created_at FROM pdfs WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(artifact)
    }

    /// Location of the file behind an artifact id.
    pub async fn file_path_by_id(&self, id: i64) -> Result<Option<String>, StoreError> {
        let path = sqlx::query_scalar::<_, String>("SELECT file_path FROM pdfs WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(path)
    }

    /// All artifacts, newest first.
    pub async fn list_all(&self) -> Result<Vec<Artifact>, StoreError> {
        let artifacts = sqlx::query_as::<_, Artifact>(
            "SELECT id, submission_id, file_path, file_name, created_at FROM pdfs ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(artifacts)
    }

    /// All artifacts, newest first, each paired with its submission's form data.
    ///
    /// The stores live in separate databases, so the join is a lookup per row.
    /// Form data is returned as stored. A missing submission, or one whose text
    /// is not valid JSON, yields `None` for that row only.
    pub async fn list_all_joined(
        &self,
        submissions: &SubmissionStore,
    ) -> Result<Vec<ArtifactListing>, StoreError> {
        let artifacts = self.list_all().await?;
        let mut listings = Vec::with_capacity(artifacts.len());

        for artifact in artifacts {
            let submission_data = match submissions.get_raw(artifact.submission_id).await? {
                Some(data) => match serde_json::from_str(&data) {
                    Ok(form) => Some(form),
                    Err(e) => {
                        log::warn!(
                            "Submission {} has undecodable data, listing without it: {}",
                            artifact.submission_id,
                            e
                        );
                        None
                    }
                },
                None => {
                    log::debug!(
                        "Artifact {} refers to missing submission {}",
                        artifact.id,
                        artifact.submission_id
                    );
                    None
                }
            };
            listings.push(ArtifactListing::new(artifact, submission_data));
        }

        Ok(listings)
    }
}
