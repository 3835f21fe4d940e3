//! Runtime configuration loaded from the environment (and an optional `.env` file).

use std::env;
use std::path::{Path, PathBuf};

use thiserror::Error;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3001;
const DEFAULT_DATA_DIR: &str = "./data";
const DEFAULT_CERTIFICATES_DIR: &str = "./certificates";
const DEFAULT_DOCUMENTS_DIR: &str = "./storage/aadhaar-documents";
pub const DEFAULT_ADMIN_USERNAME: &str = "admin123";
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin123";

const SUBMISSIONS_DB_FILE: &str = "form_submissions.db";
const ARTIFACTS_DB_FILE: &str = "pdf_metadata.db";
const ADMIN_DB_FILE: &str = "admin.db";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid PORT value '{0}'")]
    InvalidPort(String),
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub submissions_db_path: PathBuf,
    pub artifacts_db_path: PathBuf,
    pub admin_db_path: PathBuf,
    pub certificates_dir: PathBuf,
    /// Uploaded Aadhaar documents.
    pub documents_dir: PathBuf,
    pub default_admin_username: String,
    pub default_admin_password: String,
    /// Empty means any origin is accepted.
    pub allowed_origins: Vec<String>,
}

impl AppConfig {
    /// Build a configuration with every store and file directory under `dir`.
    pub fn with_data_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            submissions_db_path: dir.join(SUBMISSIONS_DB_FILE),
            artifacts_db_path: dir.join(ARTIFACTS_DB_FILE),
            admin_db_path: dir.join(ADMIN_DB_FILE),
            certificates_dir: dir.join("certificates"),
            documents_dir: dir.join("documents"),
            default_admin_username: DEFAULT_ADMIN_USERNAME.to_string(),
            default_admin_password: DEFAULT_ADMIN_PASSWORD.to_string(),
            allowed_origins: Vec::new(),
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let data_dir = env::var("DATA_DIR").unwrap_or_else(|_| DEFAULT_DATA_DIR.to_string());
        let mut config = Self::with_data_dir(&data_dir);

        if let Ok(host) = env::var("HOST") {
            config.host = host;
        }
        if let Ok(port) = env::var("PORT") {
            config.port = parse_port(&port)?;
        }
        if let Ok(path) = env::var("SUBMISSIONS_DB_PATH") {
            config.submissions_db_path = PathBuf::from(path);
        }
        if let Ok(path) = env::var("ARTIFACTS_DB_PATH") {
            config.artifacts_db_path = PathBuf::from(path);
        }
        if let Ok(path) = env::var("ADMIN_DB_PATH") {
            config.admin_db_path = PathBuf::from(path);
        }
        config.certificates_dir = PathBuf::from(
            env::var("CERTIFICATES_DIR").unwrap_or_else(|_| DEFAULT_CERTIFICATES_DIR.to_string()),
        );
        config.documents_dir = PathBuf::from(
            env::var("DOCUMENTS_DIR").unwrap_or_else(|_| DEFAULT_DOCUMENTS_DIR.to_string()),
        );

        config.default_admin_username = env::var("DEFAULT_ADMIN_USERNAME").unwrap_or_else(|_| {
            log::warn!("DEFAULT_ADMIN_USERNAME not set, using built-in default");
            DEFAULT_ADMIN_USERNAME.to_string()
        });
        config.default_admin_password = env::var("DEFAULT_ADMIN_PASSWORD")
            .unwrap_or_else(|_| DEFAULT_ADMIN_PASSWORD.to_string());

        if let Ok(origins) = env::var("CORS_ALLOWED_ORIGINS") {
            config.allowed_origins = parse_origins(&origins);
        }

        Ok(config)
    }
}

fn parse_port(value: &str) -> Result<u16, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidPort(value.to_string()))
}

fn parse_origins(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
