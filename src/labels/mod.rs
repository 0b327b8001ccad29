mod dto;
pub mod handlers;
pub mod render;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    handlers::routes()
}

/// Where the printable label for a fresh intake can be fetched.
pub fn label_url(serial: i64, item_id: i64, expiration_date: &str) -> String {
    format!("/pantry/label/image?serial={serial}&item_id={item_id}&expiration_date={expiration_date}")
}
