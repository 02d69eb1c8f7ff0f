/// SQLite-backed persistence slot for the workout registry
///
/// The whole registry is stored as one JSON blob under a named key in a small
/// key/value table, overwritten on every save. Reads never fail past this
/// boundary: a missing or malformed blob is "no prior data".

use crate::config::StorageConfig;
use crate::error::{AppError, Result};
use crate::workout::types::Workout;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::Row;
use std::collections::HashSet;
use std::path::Path;

/// Open (creating if needed) the database file backing the slot table
pub async fn open_pool(config: &StorageConfig) -> anyhow::Result<SqlitePool> {
    let db_path = Path::new(&config.database_path);
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| {
                anyhow::anyhow!("Failed to create data directory '{}': {}", parent.display(), e)
            })?;
        }
    }

    tracing::info!("🗄️ Opening workout database: {}", db_path.display());

    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true);
    let pool = SqlitePool::connect_with(options).await?;

    Ok(pool)
}

/// Open a private in-memory database (tests, throwaway sessions)
///
/// SQLite gives every connection its own `:memory:` database, so the pool is
/// pinned to a single connection that is never recycled.
pub async fn open_in_memory_pool() -> anyhow::Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await?;

    Ok(pool)
}

/// Persistence adapter for the workout registry
#[derive(Debug, Clone)]
pub struct WorkoutStorage {
    /// SQLite connection pool holding the slot table
    pool: SqlitePool,
    /// Slot the registry blob is stored under
    slot_key: String,
}

impl WorkoutStorage {
    /// Create new storage instance with database connection
    pub fn new(pool: SqlitePool, slot_key: impl Into<String>) -> Self {
        Self {
            pool,
            slot_key: slot_key.into(),
        }
    }

    /// Initialize the slot table
    ///
    /// Safe to call multiple times (uses IF NOT EXISTS).
    pub async fn init_schema(&self) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS slots (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub fn slot_key(&self) -> &str {
        &self.slot_key
    }

    /// Underlying connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Serialize the full ordered sequence and overwrite the slot
    pub async fn save(&self, workouts: &[Workout]) -> Result<()> {
        let blob = serde_json::to_string(workouts)
            .map_err(|e| AppError::PersistenceWrite(e.to_string()))?;

        self.write_slot(&blob)
            .await
            .map_err(|e| AppError::PersistenceWrite(e.to_string()))?;

        tracing::debug!("💾 Saved {} workouts to slot '{}'", workouts.len(), self.slot_key);
        Ok(())
    }

    /// Read the slot back into workouts
    ///
    /// Returns an empty sequence when the slot is absent, unreadable or
    /// not a list. Records that do not parse, break the numeric invariants or
    /// repeat an earlier id are skipped, and derived metrics are recomputed
    /// rather than trusted.
    pub async fn load(&self) -> Vec<Workout> {
        match self.try_load().await {
            Ok(workouts) => workouts,
            Err(e) => {
                tracing::warn!("Ignoring stored workouts: {}", e);
                Vec::new()
            }
        }
    }

    /// Drop the stored blob entirely
    pub async fn clear(&self) -> Result<()> {
        sqlx::query("DELETE FROM slots WHERE key = ?")
            .bind(&self.slot_key)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::PersistenceWrite(e.to_string()))?;

        tracing::info!("🧹 Cleared slot '{}'", self.slot_key);
        Ok(())
    }

    /// Raw slot contents, if any
    pub async fn read_slot(&self) -> anyhow::Result<Option<String>> {
        let row = sqlx::query("SELECT value FROM slots WHERE key = ?")
            .bind(&self.slot_key)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|row| row.get::<String, _>("value")))
    }

    /// Overwrite the raw slot contents
    pub async fn write_slot(&self, value: &str) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO slots (key, value, updated_at)
            VALUES (?, ?, CURRENT_TIMESTAMP)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = CURRENT_TIMESTAMP
            "#,
        )
        .bind(&self.slot_key)
        .bind(value)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn try_load(&self) -> Result<Vec<Workout>> {
        let blob = match self
            .read_slot()
            .await
            .map_err(|e| AppError::PersistenceRead(e.to_string()))?
        {
            Some(blob) => blob,
            None => return Ok(Vec::new()),
        };

        let records: Vec<serde_json::Value> = serde_json::from_str(&blob)
            .map_err(|e| AppError::PersistenceRead(e.to_string()))?;

        let mut seen = HashSet::new();
        let mut workouts = Vec::with_capacity(records.len());
        for (index, record) in records.into_iter().enumerate() {
            let mut workout: Workout = match serde_json::from_value(record) {
                Ok(workout) => workout,
                Err(e) => {
                    tracing::warn!("Skipping unreadable stored workout #{}: {}", index, e);
                    continue;
                }
            };
            if let Err(e) = workout.validate().and_then(|_| workout.recompute_metrics()) {
                tracing::warn!("Skipping stored workout {}: {}", workout.id(), e);
                continue;
            }
            if !seen.insert(workout.id().clone()) {
                tracing::warn!("Skipping stored workout with duplicate id: {}", workout.id());
                continue;
            }
            workouts.push(workout);
        }

        tracing::info!("📥 Loaded {} workouts from slot '{}'", workouts.len(), self.slot_key);
        Ok(workouts)
    }
}
