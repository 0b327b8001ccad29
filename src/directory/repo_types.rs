use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A known kind of grocery item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct DirectoryItem {
    pub id: i64,          // permanent identity, 10 digits
    pub name: String,
    pub category: String, // one of CATEGORIES in practice, not enforced
}

/// Search hit returned to the intake page's autocomplete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct DirectoryMatch {
    pub id: i64,
    pub name: String,
}

impl From<&DirectoryItem> for DirectoryMatch {
    fn from(item: &DirectoryItem) -> Self {
        Self {
            id: item.id,
            name: item.name.clone(),
        }
    }
}
