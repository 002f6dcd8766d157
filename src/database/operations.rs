//! Database CRUD operations

use crate::utils::config::AppSettings;
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Pool, Row, Sqlite};
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::{debug, warn};

/// Database manager
#[derive(Clone)]
pub struct DatabaseManager {
    pool: Pool<Sqlite>,
}

impl DatabaseManager {
    /// Create new database manager
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    // ============================================================
    // Settings
    // ============================================================

    /// Save setting
    pub async fn save_setting(&self, key: &str, value: &str) -> Result<()> {
        sqlx::query("INSERT OR REPLACE INTO settings (key, value) VALUES (?, ?)")
            .bind(key)
            .bind(value)
            .execute(&self.pool)
            .await?;

        debug!("Saved setting: {} = {}", key, value);
        Ok(())
    }

    /// Get setting
    pub async fn get_setting(&self, key: &str) -> Result<Option<String>> {
        let row = sqlx::query("SELECT value FROM settings WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|r| r.get("value")))
    }

    /// Get all settings
    pub async fn get_all_settings(&self) -> Result<HashMap<String, String>> {
        let rows = sqlx::query("SELECT key, value FROM settings")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| (row.get("key"), row.get("value")))
            .collect())
    }

    /// Write every preference in one transaction
    pub async fn save_settings(&self, settings: &AppSettings) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        for (key, value) in settings.to_pairs() {
            sqlx::query("INSERT OR REPLACE INTO settings (key, value) VALUES (?, ?)")
                .bind(key)
                .bind(value)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;
        debug!("Saved preferences");
        Ok(())
    }

    /// Stored preferences layered over the defaults
    pub async fn load_settings(&self) -> Result<AppSettings> {
        let pairs = self.get_all_settings().await?;
        Ok(AppSettings::from_pairs(&pairs))
    }

    // ============================================================
    // Download history
    // ============================================================

    /// Save download record
    pub async fn save_download(&self, record: &DownloadRecord) -> Result<()> {
        sqlx::query(
            r#"
            INSERT OR REPLACE INTO downloads
            (id, batch_id, url, title, format_type, output_path, status, error_message, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&record.id)
        .bind(&record.batch_id)
        .bind(&record.url)
        .bind(&record.title)
        .bind(&record.format_type)
        .bind(
            record
                .output_path
                .as_ref()
                .map(|p| p.to_string_lossy().into_owned()),
        )
        .bind(record.status.as_str())
        .bind(&record.error_message)
        .bind(record.created_at)
        .execute(&self.pool)
        .await?;

        debug!("Saved download record: {}", record.id);
        Ok(())
    }

    /// Most recent downloads first
    pub async fn recent_downloads(&self, limit: u32) -> Result<Vec<DownloadRecord>> {
        let rows = sqlx::query("SELECT * FROM downloads ORDER BY created_at DESC LIMIT ?")
            .bind(i64::from(limit))
            .fetch_all(&self.pool)
            .await?;

        let mut downloads = Vec::with_capacity(rows.len());
        for row in rows {
            downloads.push(row_into_download_record(row)?);
        }

        Ok(downloads)
    }

    /// Get downloads by status
    pub async fn get_downloads_by_status(&self, status: HistoryStatus) -> Result<Vec<DownloadRecord>> {
        let rows = sqlx::query("SELECT * FROM downloads WHERE status = ? ORDER BY created_at DESC")
            .bind(status.as_str())
            .fetch_all(&self.pool)
            .await?;

        let mut downloads = Vec::with_capacity(rows.len());
        for row in rows {
            downloads.push(row_into_download_record(row)?);
        }

        Ok(downloads)
    }

    /// Remove every history row, returning how many were deleted
    pub async fn clear_history(&self) -> Result<u64> {
        let result = sqlx::query("DELETE FROM downloads").execute(&self.pool).await?;
        debug!("Cleared {} history row(s)", result.rows_affected());
        Ok(result.rows_affected())
    }
}

/// Outcome of one history entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HistoryStatus {
    Completed,
    Failed,
    Cancelled,
}

impl HistoryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            HistoryStatus::Completed => "completed",
            HistoryStatus::Failed => "failed",
            HistoryStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for HistoryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            HistoryStatus::Completed => "Completed",
            HistoryStatus::Failed => "Failed",
            HistoryStatus::Cancelled => "Cancelled",
        };
        f.write_str(label)
    }
}

impl FromStr for HistoryStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "completed" => Ok(HistoryStatus::Completed),
            "failed" => Ok(HistoryStatus::Failed),
            "cancelled" => Ok(HistoryStatus::Cancelled),
            other => Err(format!("unknown history status: {}", other)),
        }
    }
}

/// Download record
#[derive(Debug, Clone, PartialEq)]
pub struct DownloadRecord {
    pub id: String,
    pub batch_id: String,
    pub url: String,
    pub title: String,
    /// `video` or `audio`
    pub format_type: String,
    pub output_path: Option<PathBuf>,
    pub status: HistoryStatus,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Convert database row to download record
fn row_into_download_record(row: sqlx::sqlite::SqliteRow) -> Result<DownloadRecord> {
    let raw_status: String = row.get("status");
    let status = raw_status.parse().unwrap_or_else(|e| {
        warn!("{}", e);
        HistoryStatus::Failed
    });

    Ok(DownloadRecord {
        id: row.get("id"),
        batch_id: row.get("batch_id"),
        url: row.get("url"),
        title: row.get("title"),
        format_type: row.get("format_type"),
        output_path: row
            .get::<Option<String>, _>("output_path")
            .map(PathBuf::from),
        status,
        error_message: row.get("error_message"),
        created_at: row.get("created_at"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::initialize_database;
    use chrono::Duration;

    async fn open() -> (tempfile::TempDir, DatabaseManager) {
        let dir = tempfile::tempdir().unwrap();
        let pool = initialize_database(&dir.path().join("test.db")).await.unwrap();
        (dir, DatabaseManager::new(pool))
    }

    fn record(id: &str, status: HistoryStatus, age_minutes: i64) -> DownloadRecord {
        DownloadRecord {
            id: id.to_string(),
            batch_id: "batch".to_string(),
            url: format!("https://example.com/{}", id),
            title: format!("Item {}", id),
            format_type: "audio".to_string(),
            output_path: None,
            status,
            error_message: None,
            created_at: Utc::now() - Duration::minutes(age_minutes),
        }
    }

    #[tokio::test]
    async fn test_setting_roundtrip() {
        let (_dir, db) = open().await;
        assert_eq!(db.get_setting("missing").await.unwrap(), None);
        db.save_setting("mode", "advanced").await.unwrap();
        db.save_setting("mode", "basic").await.unwrap();
        assert_eq!(db.get_setting("mode").await.unwrap().as_deref(), Some("basic"));
    }

    #[tokio::test]
    async fn test_empty_database_loads_defaults() {
        let (_dir, db) = open().await;
        assert_eq!(db.load_settings().await.unwrap(), AppSettings::default());
    }

    #[tokio::test]
    async fn test_history_order_and_filter() {
        let (_dir, db) = open().await;
        db.save_download(&record("old", HistoryStatus::Completed, 30))
            .await
            .unwrap();
        let mut failed = record("new", HistoryStatus::Failed, 1);
        failed.error_message = Some("ERROR: gone".to_string());
        db.save_download(&failed).await.unwrap();

        let recent = db.recent_downloads(10).await.unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].id, "new");
        assert_eq!(recent[0].error_message.as_deref(), Some("ERROR: gone"));

        let completed = db
            .get_downloads_by_status(HistoryStatus::Completed)
            .await
            .unwrap();
        assert_eq!(completed.len(), 1);
        assert_eq!(completed[0].id, "old");

        assert_eq!(db.recent_downloads(1).await.unwrap().len(), 1);
        assert_eq!(db.clear_history().await.unwrap(), 2);
        assert!(db.recent_downloads(10).await.unwrap().is_empty());
    }

    #[test]
    fn test_status_parsing() {
        assert_eq!("cancelled".parse::<HistoryStatus>(), Ok(HistoryStatus::Cancelled));
        assert!("paused".parse::<HistoryStatus>().is_err());
        assert_eq!(HistoryStatus::Completed.to_string(), "Completed");
    }
}
