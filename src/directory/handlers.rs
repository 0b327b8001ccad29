use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
    Form, Json, Router,
};
use tracing::{instrument, warn};

use crate::{
    directory::{
        dto::{AddItemForm, AddedItemResponse, IntakeOptions, ItemIdForm, ItemNameResponse, SearchQuery},
        repo_types::{DirectoryItem, DirectoryMatch},
        services::{self, CATEGORIES, SEARCH_LIMIT},
    },
    error::{required, required_i64, AppResult},
    state::AppState,
};

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/pantry/intake", get(intake_options))
        .route("/pantry/directory", get(list_directory))
        .route("/pantry/directory/search", get(search_directory))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/pantry/directory/add", post(add_directory_item))
        .route("/pantry/directory/delete", post(delete_directory_item))
        .route("/pantry/directory/get_item", post(get_directory_item))
}

#[instrument(skip(state))]
pub async fn intake_options(State(state): State<AppState>) -> AppResult<Json<IntakeOptions>> {
    let items = services::list_items(&state).await?;
    Ok(Json(IntakeOptions {
        items,
        categories: CATEGORIES.to_vec(),
    }))
}

#[instrument(skip(state))]
pub async fn list_directory(State(state): State<AppState>) -> AppResult<Json<Vec<DirectoryItem>>> {
    Ok(Json(services::list_items(&state).await?))
}

#[instrument(skip(state))]
pub async fn search_directory(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<Vec<DirectoryMatch>>> {
    let hits = services::search(&state, &query.q, SEARCH_LIMIT).await?;
    Ok(Json(hits))
}

#[instrument(skip(state))]
pub async fn add_directory_item(
    State(state): State<AppState>,
    Form(form): Form<AddItemForm>,
) -> AppResult<(StatusCode, Json<AddedItemResponse>)> {
    let name = required(form.name, "name")?;
    let category = required(form.category, "category")?;
    let id = services::add_item(&state, &name, &category).await?;
    Ok((StatusCode::CREATED, Json(AddedItemResponse { id })))
}

#[instrument(skip(state))]
pub async fn delete_directory_item(
    State(state): State<AppState>,
    Form(form): Form<ItemIdForm>,
) -> AppResult<StatusCode> {
    let id = required_i64(form.item_id, "item_id")?;
    services::delete_item(&state, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Lenient lookup used by the planner UI: a missing, malformed or unknown
/// id answers `{"name": null}` instead of an error.
#[instrument(skip(state))]
pub async fn get_directory_item(
    State(state): State<AppState>,
    Form(form): Form<ItemIdForm>,
) -> AppResult<Json<ItemNameResponse>> {
    let Some(id) = form.item_id.and_then(|v| v.trim().parse::<i64>().ok()) else {
        return Ok(Json(ItemNameResponse { name: None }));
    };
    let item = services::get_item(&state, id).await?;
    if item.is_none() {
        warn!(id, "directory lookup for unknown id");
    }
    Ok(Json(ItemNameResponse {
        name: item.map(|i| i.name),
    }))
}
