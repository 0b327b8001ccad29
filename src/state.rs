use std::sync::Arc;

use anyhow::Context;
use sqlx::PgPool;

use crate::config::{AppConfig, StoreBackend};
use crate::directory::{memory::MemoryDirectoryRepo, repo::PgDirectoryRepo, DirectoryRepo};
use crate::ids::{IdSource, RandomIds};
use crate::labels::render::{LabelRenderer, SvgLabelRenderer};
use crate::pantry::{memory::MemoryPantryRepo, repo::PgPantryRepo, PantryRepo};
use crate::plans::{memory::MemoryMealPlanRepo, repo::PgMealPlanRepo, MealPlanRepo};
use crate::shopping::document::{DocumentRenderer, PdfDocumentRenderer};

/// Store objects and renderers, built once at startup and handed to every
/// handler through axum's `State`.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub directory: Arc<dyn DirectoryRepo>,
    pub pantry: Arc<dyn PantryRepo>,
    pub plans: Arc<dyn MealPlanRepo>,
    pub ids: Arc<dyn IdSource>,
    pub documents: Arc<dyn DocumentRenderer>,
    pub labels: Arc<dyn LabelRenderer>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        match config.store {
            StoreBackend::Memory => {
                tracing::warn!("using in-memory store; data is lost on restart");
                Ok(Self::in_memory(config))
            }
            StoreBackend::Postgres => {
                let db_cfg = config
                    .database
                    .as_ref()
                    .context("postgres backend without database config")?;
                let db = sqlx::postgres::PgPoolOptions::new()
                    .max_connections(db_cfg.max_connections)
                    .connect(&db_cfg.url)
                    .await
                    .context("connect to database")?;

                if let Err(e) = sqlx::migrate!("./migrations").run(&db).await {
                    tracing::warn!(error = %e, "migration failed; continuing");
                }

                Ok(Self::postgres(config, db))
            }
        }
    }

    pub fn postgres(config: Arc<AppConfig>, db: PgPool) -> Self {
        Self {
            config,
            directory: Arc::new(PgDirectoryRepo::new(db.clone())),
            pantry: Arc::new(PgPantryRepo::new(db.clone())),
            plans: Arc::new(PgMealPlanRepo::new(db)),
            ids: Arc::new(RandomIds),
            documents: Arc::new(PdfDocumentRenderer),
            labels: Arc::new(SvgLabelRenderer),
        }
    }

    pub fn in_memory(config: Arc<AppConfig>) -> Self {
        Self {
            config,
            directory: Arc::new(MemoryDirectoryRepo::default()),
            pantry: Arc::new(MemoryPantryRepo::default()),
            plans: Arc::new(MemoryMealPlanRepo::default()),
            ids: Arc::new(RandomIds),
            documents: Arc::new(PdfDocumentRenderer),
            labels: Arc::new(SvgLabelRenderer),
        }
    }

    #[cfg(test)]
    pub fn with_ids(mut self, ids: Arc<dyn IdSource>) -> Self {
        self.ids = ids;
        self
    }

    #[cfg(test)]
    pub fn fake() -> Self {
        Self::in_memory(Arc::new(AppConfig::in_memory()))
    }
}
