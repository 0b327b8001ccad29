use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::{Date, OffsetDateTime};

time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

/// One physical unit in stock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct PantryEntry {
    pub serial: i64,
    pub item_id: i64,
    // name/category are copied from the directory at intake
    pub name: String,
    pub category: String,
    #[serde(with = "time::serde::rfc3339")]
    pub ingestion_date: OffsetDateTime,
    #[serde(with = "iso_date")]
    pub expiration_date: Date,
}

/// Values written at intake; the store assigns nothing but accepts the
/// caller's serial.
#[derive(Debug, Clone)]
pub struct NewPantryEntry<'a> {
    pub item_id: i64,
    pub name: &'a str,
    pub category: &'a str,
    pub ingestion_date: OffsetDateTime,
    pub expiration_date: Date,
}

impl NewPantryEntry<'_> {
    pub fn with_serial(&self, serial: i64) -> PantryEntry {
        PantryEntry {
            serial,
            item_id: self.item_id,
            name: self.name.to_string(),
            category: self.category.to_string(),
            ingestion_date: self.ingestion_date,
            expiration_date: self.expiration_date,
        }
    }
}
