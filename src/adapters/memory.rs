//! In-memory snapshot store
//!
//! Keeps the "persisted" snapshot in a mutex-guarded slot. Used by tests and
//! demo contexts that do not want a data directory; load/save semantics are
//! identical to the file-backed store.

use std::sync::Mutex;

use crate::domain::result::{Error, Result};
use crate::domain::StoreSnapshot;
use crate::ports::SnapshotStore;

/// Memory-backed snapshot store
#[derive(Default)]
pub struct InMemoryStore {
    slot: Mutex<Option<StoreSnapshot>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with an existing snapshot (for restore tests)
    pub fn with_snapshot(snapshot: StoreSnapshot) -> Self {
        Self {
            slot: Mutex::new(Some(snapshot)),
        }
    }
}

impl SnapshotStore for InMemoryStore {
    fn load(&self) -> Result<Option<StoreSnapshot>> {
        let slot = self
            .slot
            .lock()
            .map_err(|e| Error::persistence(format!("lock poisoned: {}", e)))?;
        Ok(slot.clone())
    }

    fn save(&self, snapshot: &StoreSnapshot) -> Result<()> {
        let mut slot = self
            .slot
            .lock()
            .map_err(|e| Error::persistence(format!("lock poisoned: {}", e)))?;
        *slot = Some(snapshot.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::User;

    #[test]
    fn test_empty_store_loads_none() {
        let store = InMemoryStore::new();
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_save_then_load() {
        let store = InMemoryStore::new();
        let snapshot = StoreSnapshot {
            users: vec![User::new(1, "Ann", "ann@x.com", "secret1", "2024-01-01")],
            last_user_id: 1,
            ..Default::default()
        };
        store.save(&snapshot).unwrap();
        assert_eq!(store.load().unwrap().unwrap(), snapshot);
    }
}
