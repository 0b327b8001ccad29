use tracing::{debug, info};

use crate::directory::repo_types::{DirectoryItem, DirectoryMatch};
use crate::error::AppResult;
use crate::state::AppState;

pub const SEARCH_LIMIT: i64 = 10;

/// Category suggestions offered on the intake page.
pub const CATEGORIES: [&str; 9] = [
    "Ingredients",
    "Meats",
    "Dairy",
    "Pasta",
    "Spices",
    "Canned goods",
    "Frozen goods",
    "Frozen meals",
    "Drinks",
];

/// Register a new item kind under a freshly drawn id.
pub async fn add_item(state: &AppState, name: &str, category: &str) -> AppResult<i64> {
    loop {
        let id = state.ids.next_id();
        if state.directory.try_insert(id, name, category).await? {
            info!(id, name, category, "directory item added");
            return Ok(id);
        }
        debug!(id, "directory id collision; drawing again");
    }
}

pub async fn get_item(state: &AppState, id: i64) -> AppResult<Option<DirectoryItem>> {
    Ok(state.directory.get(id).await?)
}

pub async fn list_items(state: &AppState) -> AppResult<Vec<DirectoryItem>> {
    Ok(state.directory.list().await?)
}

pub async fn delete_item(state: &AppState, id: i64) -> AppResult<()> {
    state.directory.delete(id).await?;
    info!(id, "directory item deleted");
    Ok(())
}

/// An empty query yields nothing rather than the whole directory.
pub async fn search(state: &AppState, query: &str, limit: i64) -> AppResult<Vec<DirectoryMatch>> {
    if query.is_empty() {
        return Ok(Vec::new());
    }
    Ok(state.directory.search(query, limit).await?)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Arc;

    use super::*;
    use crate::ids::ScriptedIds;

    #[tokio::test]
    async fn add_then_get_round_trips() {
        let state = AppState::fake();
        for (name, category) in [("Milk", "Dairy"), ("Penne", "Pasta"), ("Crème fraîche", "Dairy")] {
            let id = add_item(&state, name, category).await.unwrap();
            let item = get_item(&state, id).await.unwrap().expect("item stored");
            assert_eq!(item.name, name);
            assert_eq!(item.category, category);
        }
    }

    #[tokio::test]
    async fn collisions_are_retried_and_ids_stay_distinct() {
        let ids = Arc::new(ScriptedIds::new([
            1_000_000_001,
            1_000_000_001,
            1_000_000_002,
            1_000_000_001,
            1_000_000_002,
            1_000_000_003,
        ]));
        let state = AppState::fake().with_ids(ids.clone());

        let mut seen = HashSet::new();
        for name in ["Milk", "Eggs", "Flour"] {
            let id = add_item(&state, name, "Ingredients").await.unwrap();
            assert!(seen.insert(id), "duplicate id {id}");
        }
        assert_eq!(
            seen,
            HashSet::from([1_000_000_001, 1_000_000_002, 1_000_000_003])
        );
        assert_eq!(ids.remaining(), 0);
    }

    #[tokio::test]
    async fn list_is_ordered_by_id() {
        let ids = Arc::new(ScriptedIds::new([3_000_000_000, 1_000_000_000, 2_000_000_000]));
        let state = AppState::fake().with_ids(ids);
        for name in ["c", "a", "b"] {
            add_item(&state, name, "Spices").await.unwrap();
        }
        let listed: Vec<i64> = list_items(&state).await.unwrap().iter().map(|i| i.id).collect();
        assert_eq!(listed, vec![1_000_000_000, 2_000_000_000, 3_000_000_000]);
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let state = AppState::fake();
        let id = add_item(&state, "Rice", "Ingredients").await.unwrap();
        delete_item(&state, id).await.unwrap();
        delete_item(&state, id).await.unwrap();
        assert!(get_item(&state, id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn search_is_case_insensitive_and_limited() {
        let state = AppState::fake();
        for i in 0..12 {
            add_item(&state, &format!("Tomato Sauce {i}"), "Canned goods")
                .await
                .unwrap();
        }
        add_item(&state, "Basil", "Spices").await.unwrap();

        let hits = search(&state, "tomato", SEARCH_LIMIT).await.unwrap();
        assert_eq!(hits.len(), 10);
        assert!(hits.iter().all(|h| h.name.starts_with("Tomato")));
        assert!(hits.windows(2).all(|w| w[0].id < w[1].id));

        let basil = search(&state, "BAS", SEARCH_LIMIT).await.unwrap();
        assert_eq!(basil.len(), 1);
        assert_eq!(basil[0].name, "Basil");
    }

    #[tokio::test]
    async fn empty_query_returns_nothing() {
        let state = AppState::fake();
        add_item(&state, "Basil", "Spices").await.unwrap();
        assert!(search(&state, "", SEARCH_LIMIT).await.unwrap().is_empty());
    }
}
