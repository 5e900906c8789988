//! Snapshot store port - persistence abstraction

use crate::domain::result::Result;
use crate::domain::StoreSnapshot;

/// Whole-store persistence abstraction
///
/// The store writes the full snapshot after every mutation; there are no
/// partial writes. No cross-process isolation is provided - the store is
/// single-writer by construction, and two processes sharing the same
/// persisted file are out of scope.
pub trait SnapshotStore: Send + Sync {
    /// Load the persisted snapshot, `None` if nothing has been saved yet
    fn load(&self) -> Result<Option<StoreSnapshot>>;

    /// Persist the full snapshot, replacing whatever was there
    fn save(&self, snapshot: &StoreSnapshot) -> Result<()>;
}
