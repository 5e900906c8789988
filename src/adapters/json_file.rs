//! JSON file snapshot store
//!
//! Persists the whole store as pretty-printed JSON in the data directory,
//! the same shape the view layer reads. Writes go through a temp file and
//! an atomic rename so a crash mid-save cannot leave a torn snapshot.

use std::path::{Path, PathBuf};

use crate::domain::result::Result;
use crate::domain::StoreSnapshot;
use crate::ports::SnapshotStore;

const STORE_FILENAME: &str = "store.json";

/// File-backed snapshot store
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Create a store persisting to `<data_dir>/store.json`
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join(STORE_FILENAME),
        }
    }

    /// Path of the snapshot file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SnapshotStore for JsonFileStore {
    fn load(&self) -> Result<Option<StoreSnapshot>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&self.path)?;
        let snapshot = serde_json::from_str(&content)?;
        Ok(Some(snapshot))
    }

    fn save(&self, snapshot: &StoreSnapshot) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(snapshot)?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, content)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::User;
    use tempfile::tempdir;

    #[test]
    fn test_load_missing_file_is_none() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::new(dir.path());
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_save_then_load_round_trips() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::new(dir.path());

        let mut snapshot = StoreSnapshot {
            users: vec![User::new(1, "Ann", "ann@x.com", "secret1", "2024-01-01")],
            last_user_id: 1,
            ..Default::default()
        };
        snapshot.sync_mirrors();

        store.save(&snapshot).unwrap();
        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded, snapshot);

        // save(load()) is a no-op on the persisted bytes
        store.save(&loaded).unwrap();
        assert_eq!(store.load().unwrap().unwrap(), snapshot);
    }

    #[test]
    fn test_save_replaces_previous_snapshot() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::new(dir.path());

        let empty = StoreSnapshot::default();
        store.save(&empty).unwrap();

        let mut with_user = StoreSnapshot {
            users: vec![User::new(1, "Ann", "ann@x.com", "secret1", "2024-01-01")],
            last_user_id: 1,
            ..Default::default()
        };
        with_user.sync_mirrors();
        store.save(&with_user).unwrap();

        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.users.len(), 1);
        assert_eq!(loaded.last_user_id, 1);
    }
}
