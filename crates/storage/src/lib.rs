use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Pool, Row, Sqlite,
};
use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use shared::domain::{EventId, RsvpId};

/// Store collaborator contract: append-only insert returning the
/// store-assigned id, and an equality-filtered, time-descending list.
/// The insert timestamp is assigned by the store, never by the caller.
#[async_trait]
pub trait RsvpStore: Send + Sync {
    async fn insert_rsvp(
        &self,
        event_id: &EventId,
        name: &str,
        guest_count: u32,
    ) -> Result<StoredRsvp>;

    async fn list_rsvps_for_event(&self, event_id: &EventId) -> Result<Vec<StoredRsvp>>;
}

#[derive(Clone)]
pub struct Storage {
    pool: Pool<Sqlite>,
}

#[derive(Debug, Clone)]
pub struct StoredRsvp {
    pub rsvp_id: RsvpId,
    pub event_id: EventId,
    pub name: String,
    pub guest_count: Option<i64>,
    pub submitted_at: DateTime<Utc>,
}

impl Storage {
    pub async fn new(database_url: &str) -> Result<Self> {
        ensure_sqlite_parent_dir_exists(database_url)?;

        let connect_options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(connect_options)
            .await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    pub async fn health_check(&self) -> Result<()> {
        let _: i64 = sqlx::query_scalar("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .context("sqlite ping failed")?;
        Ok(())
    }
}

#[async_trait]
impl RsvpStore for Storage {
    async fn insert_rsvp(
        &self,
        event_id: &EventId,
        name: &str,
        guest_count: u32,
    ) -> Result<StoredRsvp> {
        // Timestamp computed inside SQLite with millisecond precision so
        // client clocks never influence list order.
        let row = sqlx::query(
            "INSERT INTO rsvps (event_id, name, guest_count, submitted_at)
             VALUES (?, ?, ?, STRFTIME('%Y-%m-%d %H:%M:%f', 'now'))
             RETURNING id, event_id, name, guest_count, submitted_at",
        )
        .bind(event_id.as_str())
        .bind(name)
        .bind(i64::from(guest_count))
        .fetch_one(&self.pool)
        .await?;
        Ok(StoredRsvp {
            rsvp_id: RsvpId(row.get::<i64, _>(0)),
            event_id: EventId::new(row.get::<String, _>(1)),
            name: row.get::<String, _>(2),
            guest_count: row.get::<Option<i64>, _>(3),
            submitted_at: row.get::<DateTime<Utc>, _>(4),
        })
    }

    async fn list_rsvps_for_event(&self, event_id: &EventId) -> Result<Vec<StoredRsvp>> {
        let rows = sqlx::query(
            "SELECT id, event_id, name, guest_count, submitted_at
             FROM rsvps
             WHERE event_id = ?
             ORDER BY submitted_at DESC, id DESC",
        )
        .bind(event_id.as_str())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| StoredRsvp {
                rsvp_id: RsvpId(r.get::<i64, _>(0)),
                event_id: EventId::new(r.get::<String, _>(1)),
                name: r.get::<String, _>(2),
                guest_count: r.get::<Option<i64>, _>(3),
                submitted_at: r.get::<DateTime<Utc>, _>(4),
            })
            .collect())
    }
}

fn ensure_sqlite_parent_dir_exists(database_url: &str) -> Result<()> {
    let Some(path) = sqlite_path(database_url) else {
        return Ok(());
    };

    let Some(parent) = path.parent() else {
        return Ok(());
    };

    fs::create_dir_all(parent).with_context(|| {
        format!(
            "failed to create parent directory '{}' for database url '{database_url}'",
            parent.display()
        )
    })?;

    Ok(())
}

fn sqlite_path(database_url: &str) -> Option<PathBuf> {
    if database_url == "sqlite::memory:" || !database_url.starts_with("sqlite:") {
        return None;
    }

    let path = database_url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:")
        .split('?')
        .next()
        .unwrap_or_default();

    if path.is_empty() {
        return None;
    }

    Some(Path::new(path).to_path_buf())
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
