use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::directory::repo::DirectoryRepo;
use crate::directory::repo_types::{DirectoryItem, DirectoryMatch};

/// Process-local directory, keyed (and therefore ordered) by id.
#[derive(Default)]
pub struct MemoryDirectoryRepo {
    items: Mutex<BTreeMap<i64, DirectoryItem>>,
}

impl MemoryDirectoryRepo {
    fn items(&self) -> anyhow::Result<MutexGuard<'_, BTreeMap<i64, DirectoryItem>>> {
        self.items
            .lock()
            .map_err(|_| anyhow::anyhow!("directory store lock poisoned"))
    }
}

#[async_trait]
impl DirectoryRepo for MemoryDirectoryRepo {
    async fn try_insert(&self, id: i64, name: &str, category: &str) -> anyhow::Result<bool> {
        let mut items = self.items()?;
        if items.contains_key(&id) {
            return Ok(false);
        }
        items.insert(
            id,
            DirectoryItem {
                id,
                name: name.to_string(),
                category: category.to_string(),
            },
        );
        Ok(true)
    }

    async fn get(&self, id: i64) -> anyhow::Result<Option<DirectoryItem>> {
        Ok(self.items()?.get(&id).cloned())
    }

    async fn list(&self) -> anyhow::Result<Vec<DirectoryItem>> {
        Ok(self.items()?.values().cloned().collect())
    }

    async fn delete(&self, id: i64) -> anyhow::Result<()> {
        self.items()?.remove(&id);
        Ok(())
    }

    async fn search(&self, needle: &str, limit: i64) -> anyhow::Result<Vec<DirectoryMatch>> {
        let needle = needle.to_lowercase();
        let limit = usize::try_from(limit).unwrap_or(0);
        Ok(self
            .items()?
            .values()
            .filter(|item| item.name.to_lowercase().contains(&needle))
            .take(limit)
            .map(DirectoryMatch::from)
            .collect())
    }
}
