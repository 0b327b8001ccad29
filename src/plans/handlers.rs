use axum::{
    extract::{Query, State},
    routing::{get, post},
    Form, Json, Router,
};
use tracing::instrument;

use crate::{
    error::{required, AppResult},
    plans::{
        dto::{SaveWeekInput, WeekQuery},
        repo_types::{WeekKey, WeekPlan},
        services,
    },
    state::AppState,
};

pub fn read_routes() -> Router<AppState> {
    Router::new().route("/get_week_items", get(get_week))
}

pub fn write_routes() -> Router<AppState> {
    Router::new().route("/save_week", post(save_week))
}

/// POST /save_week with the planner form; answers the merged plan.
#[instrument(skip(state, form))]
pub async fn save_week(
    State(state): State<AppState>,
    Form(form): Form<Vec<(String, String)>>,
) -> AppResult<Json<WeekPlan>> {
    let input = SaveWeekInput::from_pairs(form)?;
    let plan = services::save_week(&state, input.week, &input.fields).await?;
    Ok(Json(plan))
}

#[instrument(skip(state))]
pub async fn get_week(
    State(state): State<AppState>,
    Query(query): Query<WeekQuery>,
) -> AppResult<Json<WeekPlan>> {
    let week = WeekKey::parse(&required(query.week, "week")?)?;
    Ok(Json(services::get_week(&state, &week).await?))
}
