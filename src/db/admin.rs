//! Admin credential store for dashboard gating
//!
//! Passwords are stored and compared as plain text.

use sqlx::SqlitePool;
use std::path::Path;
use subtle::ConstantTimeEq;

use super::StoreError;

#[derive(Clone)]
pub struct AdminStore {
    pool: SqlitePool,
}

impl AdminStore {
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
            CREATE TABLE IF NOT EXISTS admin (
                admin TEXT PRIMARY KEY,
                password TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Get count of admins in database
    pub async fn count(&self) -> Result<i64, StoreError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM admin")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Insert the default credential when the table is empty.
    ///
    /// Returns whether a row was created.
    pub async fn seed_default(&self, username: &str, password: &str) -> Result<bool, StoreError> {
        if self.count().await? > 0 {
            return Ok(false);
        }

        let result = sqlx::query("INSERT OR IGNORE INTO admin (admin, password) VALUES (?, ?)")
            .bind(username)
            .bind(password)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Check a username/password pair against the stored credential.
    pub async fn verify(&self, username: &str, password: &str) -> Result<bool, StoreError> {
        let stored = sqlx::query_scalar::<_, String>("SELECT password FROM admin WHERE admin = ?")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;

        Ok(match stored {
            Some(stored) => bool::from(stored.as_bytes().ct_eq(password.as_bytes())),
            None => false,
        })
    }

    /// Usernames of every admin.
    pub async fn list_admins(&self) -> Result<Vec<String>, StoreError> {
        let admins = sqlx::query_scalar::<_, String>("SELECT admin FROM admin ORDER BY admin")
            .fetch_all(&self.pool)
            .await?;
        Ok(admins)
    }
}
