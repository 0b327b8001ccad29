use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use time::{OffsetDateTime, PrimitiveDateTime, UtcOffset};

use crate::pantry::repo_types::{NewPantryEntry, PantryEntry};

#[async_trait]
pub trait PantryRepo: Send + Sync {
    /// Insert under `serial`. Returns `false` when the serial is taken.
    async fn try_insert(&self, serial: i64, entry: &NewPantryEntry<'_>) -> anyhow::Result<bool>;
    async fn count(&self, item_id: i64) -> anyhow::Result<u64>;
    async fn get(&self, serial: i64) -> anyhow::Result<Option<PantryEntry>>;
    async fn remove(&self, serial: i64) -> anyhow::Result<()>;
    /// Delete the soonest-expiring unit of `item_id`. Returns the removed
    /// serial, if any.
    async fn remove_oldest(&self, item_id: i64) -> anyhow::Result<Option<i64>>;
    /// Everything in stock, soonest-expiring first.
    async fn list(&self) -> anyhow::Result<Vec<PantryEntry>>;
}

/// The `pantry` table keeps the directory id in a column named `id` and
/// the intake time as a UTC `TIMESTAMP`; both are mapped here.
const SELECT_ENTRY: &str = r#"
    SELECT serial,
           id AS item_id,
           name,
           category,
           ingestion_date AT TIME ZONE 'UTC' AS ingestion_date,
           expiration_date
    FROM pantry
"#;

fn utc_timestamp(at: OffsetDateTime) -> PrimitiveDateTime {
    let utc = at.to_offset(UtcOffset::UTC);
    PrimitiveDateTime::new(utc.date(), utc.time())
}

#[derive(Clone)]
pub struct PgPantryRepo {
    db: PgPool,
}

impl PgPantryRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PantryRepo for PgPantryRepo {
    async fn try_insert(&self, serial: i64, entry: &NewPantryEntry<'_>) -> anyhow::Result<bool> {
        let res = sqlx::query(
            r#"
            INSERT INTO pantry (serial, id, name, category, ingestion_date, expiration_date)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (serial) DO NOTHING
            "#,
        )
        .bind(serial)
        .bind(entry.item_id)
        .bind(entry.name)
        .bind(entry.category)
        .bind(utc_timestamp(entry.ingestion_date))
        .bind(entry.expiration_date)
        .execute(&self.db)
        .await
        .context("insert pantry entry")?;
        Ok(res.rows_affected() == 1)
    }

    async fn count(&self, item_id: i64) -> anyhow::Result<u64> {
        let n: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM pantry WHERE id = $1")
            .bind(item_id)
            .fetch_one(&self.db)
            .await
            .context("count pantry entries")?;
        Ok(n.max(0) as u64)
    }

    async fn get(&self, serial: i64) -> anyhow::Result<Option<PantryEntry>> {
        let row = sqlx::query_as::<_, PantryEntry>(&format!("{SELECT_ENTRY} WHERE serial = $1"))
        .bind(serial)
        .fetch_optional(&self.db)
        .await
        .context("get pantry entry")?;
        Ok(row)
    }

    async fn remove(&self, serial: i64) -> anyhow::Result<()> {
        sqlx::query("DELETE FROM pantry WHERE serial = $1")
            .bind(serial)
            .execute(&self.db)
            .await
            .context("remove pantry entry")?;
        Ok(())
    }

    async fn remove_oldest(&self, item_id: i64) -> anyhow::Result<Option<i64>> {
        let removed: Option<i64> = sqlx::query_scalar(
            r#"
            DELETE FROM pantry
            WHERE serial = (
                SELECT serial
                  FROM pantry
                 WHERE id = $1
                 ORDER BY expiration_date ASC, serial ASC
                 LIMIT 1
            )
            RETURNING serial
            "#,
        )
        .bind(item_id)
        .fetch_optional(&self.db)
        .await
        .context("remove oldest pantry entry")?;
        Ok(removed)
    }

    async fn list(&self) -> anyhow::Result<Vec<PantryEntry>> {
        let rows = sqlx::query_as::<_, PantryEntry>(&format!(
            "{SELECT_ENTRY} ORDER BY expiration_date ASC, serial ASC"
        ))
        .fetch_all(&self.db)
        .await
        .context("list pantry")?;
        Ok(rows)
    }
}
