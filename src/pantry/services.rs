use time::{macros::format_description, Date, OffsetDateTime};
use tracing::{debug, info};

use crate::error::{AppError, AppResult};
use crate::pantry::repo_types::{NewPantryEntry, PantryEntry};
use crate::state::AppState;

pub fn parse_expiration(raw: &str) -> AppResult<Date> {
    Date::parse(raw.trim(), format_description!("[year]-[month]-[day]"))
        .map_err(|e| AppError::invalid("expiration_date", format!("{raw:?}: {e}")))
}

/// Take one unit of `item_id` into stock and return its serial.
///
/// The directory entry must exist; its name and category are copied onto
/// the pantry row so later directory edits leave printed labels alone.
pub async fn intake(state: &AppState, item_id: i64, expiration_date: Date) -> AppResult<i64> {
    let item = state
        .directory
        .get(item_id)
        .await?
        .ok_or(AppError::UnknownItem(item_id))?;

    let entry = NewPantryEntry {
        item_id: item.id,
        name: &item.name,
        category: &item.category,
        ingestion_date: OffsetDateTime::now_utc(),
        expiration_date,
    };

    loop {
        let serial = state.ids.next_id();
        if state.pantry.try_insert(serial, &entry).await? {
            info!(serial, item_id, %expiration_date, "pantry intake");
            return Ok(serial);
        }
        debug!(serial, "pantry serial collision; drawing again");
    }
}

pub async fn count(state: &AppState, item_id: i64) -> AppResult<u64> {
    Ok(state.pantry.count(item_id).await?)
}

pub async fn get(state: &AppState, serial: i64) -> AppResult<Option<PantryEntry>> {
    Ok(state.pantry.get(serial).await?)
}

pub async fn remove(state: &AppState, serial: i64) -> AppResult<()> {
    state.pantry.remove(serial).await?;
    info!(serial, "pantry entry removed");
    Ok(())
}

pub async fn remove_oldest(state: &AppState, item_id: i64) -> AppResult<Option<i64>> {
    let removed = state.pantry.remove_oldest(item_id).await?;
    match removed {
        Some(serial) => info!(item_id, serial, "oldest pantry entry removed"),
        None => debug!(item_id, "nothing in stock to remove"),
    }
    Ok(removed)
}

pub async fn list(state: &AppState) -> AppResult<Vec<PantryEntry>> {
    Ok(state.pantry.list().await?)
}
