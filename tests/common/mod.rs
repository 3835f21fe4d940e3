#![allow(dead_code)]

use birth_certificate_server::certificate::models::BirthRecord;
use birth_certificate_server::{AppConfig, AppState};
use serde_json::Value;
use sqlx::SqlitePool;
use std::path::Path;
use tempfile::TempDir;

/// App state backed by fresh SQLite files in a temporary directory.
///
/// Keep the returned `TempDir` alive for the duration of the test.
pub async fn setup_test_app_state() -> (TempDir, AppState) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config = AppConfig::with_data_dir(dir.path());
    let state = AppState::new(&config)
        .await
        .expect("Failed to create AppState");
    (dir, state)
}

/// The Sharma family record used throughout the tests.
pub fn sample_record() -> BirthRecord {
    BirthRecord {
        first_name: "Aarav".to_string(),
        middle_name: None,
        last_name: "Sharma".to_string(),
        date_of_birth: "2020-01-01".to_string(),
        gender: "male".to_string(),
        time_of_birth: None,
        place_of_birth: "Mumbai".to_string(),
        father_name: "Raj Sharma".to_string(),
        father_aadhaar_number: "111122223333".to_string(),
        mother_name: "Priya Sharma".to_string(),
        mother_aadhaar_number: "444455556666".to_string(),
        issuing_authority: None,
        registration_number: None,
        aadhaar_consent_given: None,
    }
}

/// The form payload a client would send for `record`.
pub fn form_of(record: &BirthRecord) -> Value {
    serde_json::to_value(record).expect("Failed to serialize record")
}

pub fn sample_form() -> Value {
    form_of(&sample_record())
}

/// A pool that has already been closed: every query on it fails.
pub async fn closed_pool() -> SqlitePool {
    let pool = SqlitePool::connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory database");
    pool.close().await;
    pool
}

/// Names of the files directly inside `dir`.
pub fn file_names(dir: &Path) -> Vec<String> {
    std::fs::read_dir(dir)
        .expect("Failed to read dir")
        .filter_map(Result::ok)
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .collect()
}

/// Whether `needle` occurs byte-for-byte in `haystack`.
pub fn contains_bytes(haystack: &[u8], needle: &str) -> bool {
    haystack
        .windows(needle.len())
        .any(|window| window == needle.as_bytes())
}
