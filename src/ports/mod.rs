//! Port definitions - trait seams for external dependencies

mod card_gateway;
mod snapshot_store;

pub use card_gateway::{CardApproval, CardCharge, CardGateway};
pub use snapshot_store::SnapshotStore;
