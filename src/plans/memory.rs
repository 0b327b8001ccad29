use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::plans::repo::MealPlanRepo;
use crate::plans::repo_types::{merge_fields, PlanFields, WeekKey};

#[derive(Default)]
pub struct MemoryMealPlanRepo {
    weeks: Mutex<HashMap<WeekKey, PlanFields>>,
}

#[async_trait]
impl MealPlanRepo for MemoryMealPlanRepo {
    async fn save_week(&self, week: &WeekKey, partial: &PlanFields) -> anyhow::Result<PlanFields> {
        let mut weeks = self
            .weeks
            .lock()
            .map_err(|_| anyhow::anyhow!("meal plan store lock poisoned"))?;
        let stored = weeks.entry(week.clone()).or_default();
        merge_fields(stored, partial);
        Ok(stored.clone())
    }

    async fn load_week(&self, week: &WeekKey) -> anyhow::Result<Option<PlanFields>> {
        let weeks = self
            .weeks
            .lock()
            .map_err(|_| anyhow::anyhow!("meal plan store lock poisoned"))?;
        Ok(weeks.get(week).cloned())
    }
}
