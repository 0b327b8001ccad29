use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use tracing::instrument;

use crate::{
    error::{required, AppResult},
    plans::{repo_types::WeekKey, WeekQuery},
    shopping::{
        dto::ShoppingListResponse,
        services::{shopping_list, shopping_list_document},
    },
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/shopping_list", get(preview_shopping_list))
        .route("/download_shopping_list", get(download_shopping_list))
}

#[instrument(skip(state))]
pub async fn preview_shopping_list(
    State(state): State<AppState>,
    Query(query): Query<WeekQuery>,
) -> AppResult<Json<ShoppingListResponse>> {
    let week = WeekKey::parse(&required(query.week, "week")?)?;
    let list = shopping_list(&state, &week).await?;
    Ok(Json(ShoppingListResponse {
        week: week.to_string(),
        list,
    }))
}

/// GET /download_shopping_list?week=…, served as a PDF attachment.
#[instrument(skip(state))]
pub async fn download_shopping_list(
    State(state): State<AppState>,
    Query(query): Query<WeekQuery>,
) -> AppResult<impl IntoResponse> {
    let week = WeekKey::parse(&required(query.week, "week")?)?;
    let pdf = shopping_list_document(&state, &week).await?;

    let disposition = format!(
        "attachment; filename=\"shopping_list_{}.pdf\"",
        file_safe(week.as_str())
    );
    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        pdf,
    ))
}

fn file_safe(week: &str) -> String {
    week.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
        .collect()
}
