use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    routing::{get, post},
    Form, Json, Router,
};
use tracing::instrument;

use crate::{
    error::{required, required_i64, AppError, AppResult},
    labels::label_url,
    pantry::{
        dto::{IntakeForm, IntakeResponse, ItemCountResponse, ItemIdForm, SerialForm},
        repo_types::PantryEntry,
        services,
    },
    state::AppState,
};

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/pantry", get(list_pantry))
        .route("/pantry/get_by_serial", post(get_by_serial))
        .route("/pantry/get_count", post(get_count))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/pantry/delete", post(remove_pantry))
        .route("/pantry/delete_by_serial", post(remove_pantry))
        .route("/pantry/delete_oldest_by_id", post(remove_oldest))
        .route("/pantry/intake/add", post(intake))
}

#[instrument(skip(state))]
pub async fn list_pantry(State(state): State<AppState>) -> AppResult<Json<Vec<PantryEntry>>> {
    Ok(Json(services::list(&state).await?))
}

#[instrument(skip(state))]
pub async fn get_by_serial(
    State(state): State<AppState>,
    Form(form): Form<SerialForm>,
) -> AppResult<Json<PantryEntry>> {
    let serial = required_i64(form.serial, "serial")?;
    let entry = services::get(&state, serial)
        .await?
        .ok_or(AppError::NotFound {
            entity: "pantry serial",
            id: serial,
        })?;
    Ok(Json(entry))
}

#[instrument(skip(state))]
pub async fn get_count(
    State(state): State<AppState>,
    Form(form): Form<ItemIdForm>,
) -> AppResult<Json<ItemCountResponse>> {
    let item_id = required_i64(form.item_id, "item_id")?;
    let count = services::count(&state, item_id).await?;
    Ok(Json(ItemCountResponse { item_id, count }))
}

#[instrument(skip(state))]
pub async fn remove_pantry(
    State(state): State<AppState>,
    Form(form): Form<SerialForm>,
) -> AppResult<StatusCode> {
    let serial = required_i64(form.serial, "serial")?;
    services::remove(&state, serial).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state))]
pub async fn remove_oldest(
    State(state): State<AppState>,
    Form(form): Form<ItemIdForm>,
) -> AppResult<StatusCode> {
    let item_id = required_i64(form.item_id, "item_id")?;
    services::remove_oldest(&state, item_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /pantry/intake/add, answered with the new serial and the URL of its
/// printable label (also in `Location`).
#[instrument(skip(state))]
pub async fn intake(
    State(state): State<AppState>,
    Form(form): Form<IntakeForm>,
) -> AppResult<(StatusCode, HeaderMap, Json<IntakeResponse>)> {
    let item_id = required_i64(form.item_id, "item_id")?;
    let raw_date = required(form.expiration_date, "expiration_date")?;
    let expiration_date = services::parse_expiration(&raw_date)?;

    let serial = services::intake(&state, item_id, expiration_date).await?;
    let label_url = label_url(serial, item_id, &expiration_date.to_string());

    let mut headers = HeaderMap::new();
    if let Ok(location) = HeaderValue::from_str(&label_url) {
        headers.insert(header::LOCATION, location);
    }

    Ok((
        StatusCode::CREATED,
        headers,
        Json(IntakeResponse { serial, label_url }),
    ))
}
