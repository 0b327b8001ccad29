use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;

use crate::directory::repo_types::{DirectoryItem, DirectoryMatch};

#[async_trait]
pub trait DirectoryRepo: Send + Sync {
    /// Insert under `id`. Returns `false` when the id is already taken.
    async fn try_insert(&self, id: i64, name: &str, category: &str) -> anyhow::Result<bool>;
    async fn get(&self, id: i64) -> anyhow::Result<Option<DirectoryItem>>;
    /// All items, ordered by id.
    async fn list(&self) -> anyhow::Result<Vec<DirectoryItem>>;
    async fn delete(&self, id: i64) -> anyhow::Result<()>;
    /// Case-insensitive containment on name, ordered by id.
    async fn search(&self, needle: &str, limit: i64) -> anyhow::Result<Vec<DirectoryMatch>>;
}

#[derive(Clone)]
pub struct PgDirectoryRepo {
    db: PgPool,
}

impl PgDirectoryRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl DirectoryRepo for PgDirectoryRepo {
    async fn try_insert(&self, id: i64, name: &str, category: &str) -> anyhow::Result<bool> {
        let res = sqlx::query(
            r#"
            INSERT INTO pantry_directory (id, name, category)
            VALUES ($1, $2, $3)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(category)
        .execute(&self.db)
        .await
        .context("insert directory item")?;
        Ok(res.rows_affected() == 1)
    }

    async fn get(&self, id: i64) -> anyhow::Result<Option<DirectoryItem>> {
        let item = sqlx::query_as::<_, DirectoryItem>(
            r#"
            SELECT id, name, category
            FROM pantry_directory
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .context("get directory item")?;
        Ok(item)
    }

    async fn list(&self) -> anyhow::Result<Vec<DirectoryItem>> {
        let rows = sqlx::query_as::<_, DirectoryItem>(
            r#"
            SELECT id, name, category
            FROM pantry_directory
            ORDER BY id
            "#,
        )
        .fetch_all(&self.db)
        .await
        .context("list directory items")?;
        Ok(rows)
    }

    async fn delete(&self, id: i64) -> anyhow::Result<()> {
        sqlx::query("DELETE FROM pantry_directory WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await
            .context("delete directory item")?;
        Ok(())
    }

    async fn search(&self, needle: &str, limit: i64) -> anyhow::Result<Vec<DirectoryMatch>> {
        // position() instead of ILIKE so '%' and '_' in the query match literally
        let rows = sqlx::query_as::<_, DirectoryMatch>(
            r#"
            SELECT id, name
            FROM pantry_directory
            WHERE position(lower($1) in lower(name)) > 0
            ORDER BY id
            LIMIT $2
            "#,
        )
        .bind(needle)
        .bind(limit)
        .fetch_all(&self.db)
        .await
        .context("search directory")?;
        Ok(rows)
    }
}
