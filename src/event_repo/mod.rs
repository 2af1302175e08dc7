// SQLite aggregation table: additive upserts keyed on (customer_id, minute).
// At most one row per key; merges only ever add, rows are never deleted.

pub mod rollup;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;
use tracing::instrument;

use crate::error::EventError;
use crate::timestamp::MS_PER_HOUR;

/// One (customer, minute bucket) partial count as handed over by a flush.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketCount {
    pub customer_id: String,
    /// Minute bucket, epoch milliseconds UTC.
    pub minute_ms: i64,
    pub event_count: i64,
}

/// One per-hour sum returned by the roll-up query.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct HourlyCount {
    /// Hour bucket, epoch milliseconds UTC.
    pub hour_ms: i64,
    pub event_count: i64,
}

pub struct EventRepo {
    pool: SqlitePool,
}

impl EventRepo {
    pub async fn connect(path: &str, max_pool_size: u32) -> Result<Self, EventError> {
        if let Some(parent) = Path::new(path).parent() {
            std::fs::create_dir_all(parent)?;
        }
        let opts = SqliteConnectOptions::from_str(&format!("sqlite:{}", path))?
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .busy_timeout(std::time::Duration::from_secs(5))
            .synchronous(sqlx::sqlite::SqliteSynchronous::Normal);
        let pool = SqlitePoolOptions::new()
            .max_connections(max_pool_size)
            .connect_with(opts)
            .await?;
        Ok(Self { pool })
    }

    pub async fn init(&self) -> Result<(), EventError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS events_aggregation (
                customer_id TEXT NOT NULL,
                minute INTEGER NOT NULL,
                event_count INTEGER NOT NULL,
                PRIMARY KEY (customer_id, minute)
            )
            "#,
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Merges a batch of partial counts in one transaction: insert new keys,
    /// add to existing ones. Entry order within the batch does not matter;
    /// either the whole batch lands or none of it does.
    #[instrument(skip(self, entries), fields(repo = "events", operation = "merge_batch", batch_size = entries.len()))]
    pub async fn merge_batch(&self, entries: &[BucketCount]) -> Result<(), EventError> {
        if entries.is_empty() {
            return Ok(());
        }
        let mut tx = self.pool.begin().await?;
        for e in entries {
            sqlx::query(
                "INSERT INTO events_aggregation (customer_id, minute, event_count)
                 VALUES ($1, $2, $3)
                 ON CONFLICT (customer_id, minute)
                 DO UPDATE SET event_count = event_count + excluded.event_count",
            )
            .bind(&e.customer_id)
            .bind(e.minute_ms)
            .bind(e.event_count)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    /// Per-hour sums for one customer over [start_ms, end_ms). Minute buckets
    /// are filtered to the range before grouping, so a boundary hour counts
    /// only its in-range minutes. Hours with no events produce no row.
    #[instrument(skip(self), fields(repo = "events", operation = "hourly_counts"))]
    pub async fn hourly_counts(
        &self,
        customer_id: &str,
        start_ms: i64,
        end_ms: i64,
    ) -> Result<Vec<HourlyCount>, EventError> {
        let rows = sqlx::query_as::<_, HourlyCount>(
            "SELECT (minute / $1) * $1 AS hour_ms, SUM(event_count) AS event_count
             FROM events_aggregation
             WHERE minute >= $2 AND minute < $3 AND customer_id = $4
             GROUP BY hour_ms",
        )
        .bind(MS_PER_HOUR)
        .bind(start_ms)
        .bind(end_ms)
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
