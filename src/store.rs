//! The store - the single mutation surface over the application state
//!
//! Holds the whole snapshot behind an async mutex and writes it through the
//! persistence port after every successful mutation. Mutations run against a
//! working copy and are committed only after the persistence write succeeds,
//! so a failed operation leaves both memory and disk exactly as before.
//!
//! Each operation is atomic from the caller's perspective. A deposit holds
//! the state lock across the gateway await (see `WalletService`), so no
//! other operation can run against the same record while a deposit is in
//! flight.

use tokio::sync::{Mutex, MutexGuard};

use crate::domain::result::Result;
use crate::domain::StoreSnapshot;
use crate::ports::SnapshotStore;

/// The application store
///
/// Constructed once at startup and injected into the services; there are no
/// ambient globals.
pub struct Store {
    state: Mutex<StoreSnapshot>,
    persistence: Box<dyn SnapshotStore>,
}

impl Store {
    /// Open the store, restoring any persisted snapshot
    ///
    /// A loaded snapshot is reconciled first: dangling current-user
    /// references are dropped, the id counter is advanced past existing
    /// ids, and the mirror fields are rebuilt from the directory.
    pub fn open(persistence: Box<dyn SnapshotStore>) -> Result<Self> {
        let mut snapshot = persistence.load()?.unwrap_or_default();
        snapshot.reconcile();
        Ok(Self {
            state: Mutex::new(snapshot),
            persistence,
        })
    }

    /// Read from the current state
    pub async fn read<T>(&self, f: impl FnOnce(&StoreSnapshot) -> T) -> T {
        let state = self.state.lock().await;
        f(&state)
    }

    /// Apply a mutation and persist the result
    ///
    /// The closure runs against a working copy; if it fails, or the
    /// persistence write fails, the in-memory state is untouched.
    pub async fn mutate<T>(&self, f: impl FnOnce(&mut StoreSnapshot) -> Result<T>) -> Result<T> {
        let mut state = self.state.lock().await;
        let mut working = state.clone();
        let value = f(&mut working)?;
        self.commit(&mut state, working)?;
        Ok(value)
    }

    /// Take the state lock directly
    ///
    /// For operations with a suspension point between validation and
    /// mutation (deposit): the guard spans the gateway await through the
    /// commit, keeping the whole operation exclusive.
    pub async fn lock(&self) -> MutexGuard<'_, StoreSnapshot> {
        self.state.lock().await
    }

    /// Commit a working copy: rebuild the mirrors, persist, then swap it in
    pub fn commit(
        &self,
        state: &mut MutexGuard<'_, StoreSnapshot>,
        mut working: StoreSnapshot,
    ) -> Result<()> {
        working.sync_mirrors();
        self.persistence.save(&working)?;
        **state = working;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryStore;
    use crate::domain::result::Error;
    use crate::domain::User;

    fn open_empty() -> Store {
        Store::open(Box::new(InMemoryStore::new())).unwrap()
    }

    #[tokio::test]
    async fn test_mutation_persists() {
        let store = open_empty();
        store
            .mutate(|s| {
                s.users
                    .push(User::new(1, "Ann", "ann@x.com", "secret1", "2024-01-01"));
                s.last_user_id = 1;
                Ok(())
            })
            .await
            .unwrap();

        assert_eq!(store.read(|s| s.users.len()).await, 1);
    }

    #[tokio::test]
    async fn test_failed_mutation_leaves_state_untouched() {
        let store = open_empty();
        let result: Result<()> = store
            .mutate(|s| {
                s.users
                    .push(User::new(1, "Ann", "ann@x.com", "secret1", "2024-01-01"));
                Err(Error::not_found("simulated failure"))
            })
            .await;

        assert!(result.is_err());
        assert_eq!(store.read(|s| s.users.len()).await, 0);
    }

    #[tokio::test]
    async fn test_open_reconciles_loaded_snapshot() {
        let snapshot = StoreSnapshot {
            users: vec![User::new(7, "Ann", "ann@x.com", "secret1", "2024-01-01")],
            last_user_id: 0,
            ..Default::default()
        };
        let store = Store::open(Box::new(InMemoryStore::with_snapshot(snapshot))).unwrap();
        assert_eq!(store.read(|s| s.last_user_id).await, 7);
    }
}
