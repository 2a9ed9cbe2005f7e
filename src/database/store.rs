use chrono::{DateTime, Utc};
use sqlx::any::{AnyPoolOptions, AnyRow};

use super::*;

/// Number of records the leaderboard shows when no limit is requested.
pub const DEFAULT_LIMIT: u32 = 100;

/// Owner of the `scores` table. Every call goes to the database;
/// nothing is cached in between.
pub struct ScoreStore {
    database: DatabasePool,
}

impl ScoreStore {
    /// Opens a connection pool to `database_url` and makes sure the
    /// `scores` table exists.
    pub async fn connect(database_url: &str, max_connections: u32) -> StoreResult<Self> {
        sqlx::any::install_default_drivers();
        let backend = schema::Backend::from_url(database_url)?;

        // Every connection to an in-memory sqlite database sees its own database,
        // so the pool must hold exactly one connection and never recycle it
        let in_memory = database_url.contains(":memory:") || database_url.contains("mode=memory");
        let options = if in_memory {
            AnyPoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            AnyPoolOptions::new().max_connections(max_connections.max(1))
        };

        let database = options.connect(database_url).await?;
        schema::migrate(&database, backend).await?;

        tracing::info!(?backend, "Score store opened");
        Ok(Self { database })
    }

    /// Fetches up to `limit` records in ranking order:
    /// ascending time, then descending rings (missing rings last), then id.
    pub async fn list_top(&self, limit: u32) -> StoreResult<Vec<ScoreRecord>> {
        let limit = limit.min(DEFAULT_LIMIT);
        let rows = sqlx::query(
            "SELECT id, name, email, time, rings, created_at FROM scores \
             ORDER BY time ASC, rings DESC NULLS LAST, id ASC LIMIT $1",
        )
        .bind(i64::from(limit))
        .fetch_all(&self.database)
        .await?;

        rows.iter().map(score_from_row).collect()
    }

    /// Inserts `score` and returns the stored record with its assigned id
    /// and creation time. No business rules are checked here.
    pub async fn create(&self, score: NewScore) -> StoreResult<ScoreRecord> {
        let created_at = now_millis();
        let row = sqlx::query(
            "INSERT INTO scores (name, email, time, rings, created_at) \
             VALUES ($1, $2, $3, $4, $5) RETURNING id",
        )
        .bind(score.name.clone())
        .bind(score.email.clone())
        .bind(score.time)
        .bind(score.rings)
        .bind(created_at.timestamp_millis())
        .fetch_one(&self.database)
        .await?;

        let id = row.try_get::<ScoreId, _>(0)?;
        tracing::info!(id, time = score.time, rings = ?score.rings, "Score created");
        Ok(ScoreRecord::new(id, score, created_at))
    }

    /// Removes the record with the given `id`.
    /// Deleting an id that is not in the table is an error.
    pub async fn delete(&self, id: ScoreId) -> StoreResult<()> {
        let response = sqlx::query("DELETE FROM scores WHERE id = $1")
            .bind(id)
            .execute(&self.database)
            .await?;

        if response.rows_affected() == 0 {
            return Err(StoreError::NotFound { id });
        }

        tracing::info!(id, "Score deleted");
        Ok(())
    }

    /// Closes every pooled connection. Called once at shutdown.
    pub async fn close(&self) {
        self.database.close().await;
        tracing::info!("Score store closed");
    }
}

/// Current time truncated to the millisecond precision stored in the table,
/// so the returned record matches what a later read yields.
fn now_millis() -> DateTime<Utc> {
    let millis = Utc::now().timestamp_millis();
    DateTime::from_timestamp_millis(millis).unwrap_or_default()
}

fn score_from_row(row: &AnyRow) -> StoreResult<ScoreRecord> {
    let created_at_millis = row.try_get::<i64, _>("created_at")?;
    let created_at = DateTime::from_timestamp_millis(created_at_millis).ok_or_else(|| {
        sqlx::Error::Decode(format!("created_at out of range: {}", created_at_millis).into())
    })?;

    Ok(ScoreRecord {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        time: row.try_get("time")?,
        rings: row.try_get("rings")?,
        created_at,
    })
}
