use tracing::info;

use crate::error::{AppError, AppResult};
use crate::plans::repo_types::{PlanFields, WeekKey, WeekPlan};
use crate::state::AppState;

/// Merge `partial` into the week's plan, creating it if needed.
pub async fn save_week(state: &AppState, week: WeekKey, partial: &PlanFields) -> AppResult<WeekPlan> {
    let fields = state.plans.save_week(&week, partial).await?;
    info!(%week, keys = partial.len(), "week saved");
    Ok(WeekPlan { week, fields })
}

pub async fn load_week(state: &AppState, week: &WeekKey) -> AppResult<Option<WeekPlan>> {
    let fields = state.plans.load_week(week).await?;
    Ok(fields.map(|fields| WeekPlan {
        week: week.clone(),
        fields,
    }))
}

/// Like [`load_week`] but a missing plan is an error.
pub async fn get_week(state: &AppState, week: &WeekKey) -> AppResult<WeekPlan> {
    load_week(state, week)
        .await?
        .ok_or_else(|| AppError::WeekNotFound(week.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plans::repo_types::{IngredientLine, PlanField};

    fn fields(pairs: &[(&str, PlanField)]) -> PlanFields {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    fn text(s: &str) -> PlanField {
        PlanField::Text(s.into())
    }

    #[tokio::test]
    async fn second_save_overlays_the_first() {
        let state = AppState::fake();
        let week = WeekKey::parse("2025-W07").unwrap();

        let a = fields(&[
            ("monday_dinner", text("Tacos")),
            ("tuesday_dinner", text("Soup")),
            (
                "monday_ingredients",
                PlanField::Ingredients(vec![IngredientLine { id: 7, qty: 3 }]),
            ),
        ]);
        let b = fields(&[
            ("tuesday_dinner", text("Curry")),
            ("wednesday_dinner", text("Pizza")),
        ]);

        save_week(&state, week.clone(), &a).await.unwrap();
        let returned = save_week(&state, week.clone(), &b).await.unwrap();
        let loaded = get_week(&state, &week).await.unwrap();

        let mut expected = a.clone();
        expected.extend(b.clone());
        assert_eq!(loaded.fields, expected);
        assert_eq!(returned, loaded);
        assert_eq!(loaded.fields["tuesday_dinner"], text("Curry"));
        assert_eq!(loaded.fields["monday_dinner"], text("Tacos"));
    }

    #[tokio::test]
    async fn weeks_are_independent() {
        let state = AppState::fake();
        let w1 = WeekKey::parse("2025-W01").unwrap();
        let w2 = WeekKey::parse("2025-W02").unwrap();
        save_week(&state, w1.clone(), &fields(&[("notes", text("one"))]))
            .await
            .unwrap();
        assert!(load_week(&state, &w2).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn missing_week_is_week_not_found() {
        let state = AppState::fake();
        let err = get_week(&state, &WeekKey::parse("1999-W01").unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::WeekNotFound(w) if w == "1999-W01"));
    }
}
