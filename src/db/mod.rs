//! Database module - AppState and the three SQLite-backed stores
//!
//! Each store owns its own pool and database file:
//! - `submission` - raw form submissions
//! - `artifact` - metadata of generated certificate files
//! - `admin` - dashboard credentials

mod admin;
mod artifact;
mod submission;

pub use admin::AdminStore;
pub use artifact::ArtifactStore;
pub use submission::SubmissionStore;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::config::AppConfig;
use crate::pdf::CertificateRenderer;

/// Errors raised by the persistence layer.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("failed to (de)serialize stored data: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("failed to prepare database location: {0}")]
    Io(#[from] std::io::Error),
}

/// Open (creating if needed) the SQLite database at `path`.
pub(crate) async fn connect(path: &Path) -> Result<SqlitePool, StoreError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }

    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(5));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(30))
        .connect_with(options)
        .await?;

    Ok(pool)
}

/// Process-wide handles shared with every request handler.
#[derive(Clone)]
pub struct AppState {
    pub submissions: SubmissionStore,
    pub artifacts: ArtifactStore,
    pub admins: AdminStore,
    pub renderer: CertificateRenderer,
    pub certificates_dir: PathBuf,
    pub documents_dir: PathBuf,
}

impl AppState {
    /// Open all stores, seed the default admin and prepare the file directories.
    pub async fn new(config: &AppConfig) -> Result<Self, StoreError> {
        let submissions = SubmissionStore::open(&config.submissions_db_path).await?;
        let artifacts = ArtifactStore::open(&config.artifacts_db_path).await?;
        let admins = AdminStore::open(&config.admin_db_path).await?;

        if admins
            .seed_default(&config.default_admin_username, &config.default_admin_password)
            .await?
        {
            log::info!(
                "Default admin user created: {}",
                config.default_admin_username
            );
        }

        Self::from_stores(
            submissions,
            artifacts,
            admins,
            config.certificates_dir.clone(),
            config.documents_dir.clone(),
        )
        .await
    }

    pub async fn from_stores(
        submissions: SubmissionStore,
        artifacts: ArtifactStore,
        admins: AdminStore,
        certificates_dir: PathBuf,
        documents_dir: PathBuf,
    ) -> Result<Self, StoreError> {
        tokio::fs::create_dir_all(&certificates_dir).await?;
        tokio::fs::create_dir_all(&documents_dir).await?;
        let renderer = CertificateRenderer::new(submissions.clone());

        Ok(AppState {
            submissions,
            artifacts,
            admins,
            renderer,
            certificates_dir,
            documents_dir,
        })
    }
}
