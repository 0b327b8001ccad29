use serde::{Deserialize, Serialize};

use crate::directory::repo_types::DirectoryItem;

#[derive(Debug, Deserialize)]
pub struct AddItemForm {
    pub name: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ItemIdForm {
    pub item_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Serialize)]
pub struct AddedItemResponse {
    pub id: i64,
}

#[derive(Debug, Serialize)]
pub struct ItemNameResponse {
    pub name: Option<String>,
}

/// What the intake page needs: every known item plus category suggestions.
#[derive(Debug, Serialize)]
pub struct IntakeOptions {
    pub items: Vec<DirectoryItem>,
    pub categories: Vec<&'static str>,
}
