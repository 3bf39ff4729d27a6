use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::types::Json;
use sqlx::Row;
use tracing::info;

use super::StoreError;
use crate::models::InstrumentMap;

/// Room index row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct RoomRow {
    pub position: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// PostgreSQL-backed store.
///
/// Two tables: `room_index` holds the ordered room names, `room_instruments`
/// holds one instrument map per room. Create, delete and flush touch both
/// inside a transaction so the index can never disagree with the set of
/// persisted maps.
pub struct DbStore {
    pool: PgPool,
}

impl DbStore {
    /// Create the connection pool and make sure the schema exists.
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        info!("Connecting to database...");

        let pool = PgPoolOptions::new()
            .max_connections(20)
            .min_connections(2)
            .acquire_timeout(Duration::from_secs(30))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .connect(database_url)
            .await?;

        let store = Self { pool };
        store.ensure_schema().await?;

        info!("Database connection pool created successfully");
        Ok(store)
    }

    async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS room_index (
                position   BIGSERIAL PRIMARY KEY,
                name       TEXT NOT NULL UNIQUE,
                created_at TIMESTAMPTZ NOT NULL DEFAULT now()
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS room_instruments (
                room        TEXT PRIMARY KEY REFERENCES room_index (name) ON DELETE CASCADE,
                instruments JSONB NOT NULL,
                updated_at  TIMESTAMPTZ NOT NULL DEFAULT now()
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn list_rooms(&self) -> Result<Vec<String>, StoreError> {
        let rows = sqlx::query_as::<_, RoomRow>(
            "SELECT position, name, created_at FROM room_index ORDER BY position",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|row| row.name).collect())
    }

    /// Index entry and initial map are written in one transaction. A
    /// concurrent create of the same name loses on the unique constraint and
    /// reports the room as already existing.
    pub async fn insert_room(&self, name: &str, map: &InstrumentMap) -> Result<bool, StoreError> {
        let mut tx = self.pool.begin().await?;

        let inserted =
            sqlx::query("INSERT INTO room_index (name) VALUES ($1) ON CONFLICT (name) DO NOTHING")
                .bind(name)
                .execute(&mut *tx)
                .await?;
        if inserted.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        sqlx::query("INSERT INTO room_instruments (room, instruments) VALUES ($1, $2)")
            .bind(name)
            .bind(Json(map))
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(true)
    }

    pub async fn delete_room(&self, name: &str) -> Result<bool, StoreError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM room_instruments WHERE room = $1")
            .bind(name)
            .execute(&mut *tx)
            .await?;
        let deleted = sqlx::query("DELETE FROM room_index WHERE name = $1")
            .bind(name)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(deleted.rows_affected() > 0)
    }

    pub async fn load_instruments(&self, name: &str) -> Result<Option<InstrumentMap>, StoreError> {
        let row = sqlx::query("SELECT instruments FROM room_instruments WHERE room = $1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => {
                let Json(map) = row.try_get::<Json<InstrumentMap>, _>("instruments")?;
                Ok(Some(map))
            }
            None => Ok(None),
        }
    }

    pub async fn save_instruments(
        &self,
        name: &str,
        map: &InstrumentMap,
    ) -> Result<bool, StoreError> {
        let updated = sqlx::query(
            "UPDATE room_instruments SET instruments = $2, updated_at = now() WHERE room = $1",
        )
        .bind(name)
        .bind(Json(map))
        .execute(&self.pool)
        .await?;

        Ok(updated.rows_affected() > 0)
    }

    pub async fn flush(&self) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM room_instruments")
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM room_index")
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(())
    }
}
