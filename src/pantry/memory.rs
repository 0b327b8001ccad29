use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::pantry::repo::PantryRepo;
use crate::pantry::repo_types::{NewPantryEntry, PantryEntry};

#[derive(Default)]
pub struct MemoryPantryRepo {
    entries: Mutex<HashMap<i64, PantryEntry>>,
}

impl MemoryPantryRepo {
    fn entries(&self) -> anyhow::Result<MutexGuard<'_, HashMap<i64, PantryEntry>>> {
        self.entries
            .lock()
            .map_err(|_| anyhow::anyhow!("pantry store lock poisoned"))
    }
}

#[async_trait]
impl PantryRepo for MemoryPantryRepo {
    async fn try_insert(&self, serial: i64, entry: &NewPantryEntry<'_>) -> anyhow::Result<bool> {
        let mut entries = self.entries()?;
        if entries.contains_key(&serial) {
            return Ok(false);
        }
        entries.insert(serial, entry.with_serial(serial));
        Ok(true)
    }

    async fn count(&self, item_id: i64) -> anyhow::Result<u64> {
        Ok(self
            .entries()?
            .values()
            .filter(|e| e.item_id == item_id)
            .count() as u64)
    }

    async fn get(&self, serial: i64) -> anyhow::Result<Option<PantryEntry>> {
        Ok(self.entries()?.get(&serial).cloned())
    }

    async fn remove(&self, serial: i64) -> anyhow::Result<()> {
        self.entries()?.remove(&serial);
        Ok(())
    }

    async fn remove_oldest(&self, item_id: i64) -> anyhow::Result<Option<i64>> {
        let mut entries = self.entries()?;
        let oldest = entries
            .values()
            .filter(|e| e.item_id == item_id)
            .min_by_key(|e| (e.expiration_date, e.serial))
            .map(|e| e.serial);
        if let Some(serial) = oldest {
            entries.remove(&serial);
        }
        Ok(oldest)
    }

    async fn list(&self) -> anyhow::Result<Vec<PantryEntry>> {
        let mut rows: Vec<PantryEntry> = self.entries()?.values().cloned().collect();
        rows.sort_by_key(|e| (e.expiration_date, e.serial));
        Ok(rows)
    }
}
