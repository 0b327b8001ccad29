use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
    routing::get,
    Router,
};
use tracing::{instrument, warn};

use crate::{
    directory::services::get_item,
    error::{required, required_i64, AppError, AppResult},
    labels::{
        dto::LabelQuery,
        render::{LabelFields, UNKNOWN_ITEM},
    },
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new().route("/pantry/label/image", get(label_image))
}

/// Label for one pantry unit. The item name comes from the directory and
/// falls back to "Unknown Item" when the id has since been deleted.
#[instrument(skip(state))]
pub async fn label_image(
    State(state): State<AppState>,
    Query(query): Query<LabelQuery>,
) -> AppResult<impl IntoResponse> {
    let serial = required_i64(query.serial, "serial")?;
    let item_id = required_i64(query.item_id, "item_id")?;
    let expiration_date = required(query.expiration_date, "expiration_date")?;

    let item_name = match get_item(&state, item_id).await? {
        Some(item) => item.name,
        None => {
            warn!(item_id, "label for unknown directory id");
            UNKNOWN_ITEM.to_string()
        }
    };

    let image = state
        .labels
        .render(&LabelFields {
            serial: &serial.to_string(),
            item_id: &item_id.to_string(),
            expiration_date: &expiration_date,
            item_name: &item_name,
        })
        .map_err(AppError::Render)?;

    Ok(([(header::CONTENT_TYPE, state.labels.content_type())], image))
}
