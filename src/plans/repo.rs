use anyhow::Context;
use async_trait::async_trait;
use sqlx::{types::Json, PgPool};

use crate::plans::repo_types::{PlanFields, WeekKey};

#[async_trait]
pub trait MealPlanRepo: Send + Sync {
    /// Create the week or overlay `partial` onto it; returns the merged fields.
    async fn save_week(&self, week: &WeekKey, partial: &PlanFields) -> anyhow::Result<PlanFields>;
    async fn load_week(&self, week: &WeekKey) -> anyhow::Result<Option<PlanFields>>;
}

#[derive(Clone)]
pub struct PgMealPlanRepo {
    db: PgPool,
}

impl PgMealPlanRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl MealPlanRepo for PgMealPlanRepo {
    async fn save_week(&self, week: &WeekKey, partial: &PlanFields) -> anyhow::Result<PlanFields> {
        // jsonb `||` is a shallow, key-wise merge done in one statement
        let Json(merged) = sqlx::query_scalar::<_, Json<PlanFields>>(
            r#"
            INSERT INTO meal_weeks (week, data)
            VALUES ($1, $2)
            ON CONFLICT (week) DO UPDATE SET data = meal_weeks.data || EXCLUDED.data
            RETURNING data
            "#,
        )
        .bind(week.as_str())
        .bind(Json(partial))
        .fetch_one(&self.db)
        .await
        .context("save week")?;
        Ok(merged)
    }

    async fn load_week(&self, week: &WeekKey) -> anyhow::Result<Option<PlanFields>> {
        let row = sqlx::query_scalar::<_, Json<PlanFields>>(
            "SELECT data FROM meal_weeks WHERE week = $1",
        )
        .bind(week.as_str())
        .fetch_optional(&self.db)
        .await
        .context("load week")?;
        Ok(row.map(|Json(fields)| fields))
    }
}
