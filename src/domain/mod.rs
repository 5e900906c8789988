//! Core domain entities
//!
//! All business entities are defined here. These are pure data structures
//! with validation logic - no I/O or external dependencies.

mod deposit;
pub mod result;
mod session;
mod snapshot;
mod user;

pub use deposit::{Deposit, DepositStatus};
pub use session::CurrentUser;
pub use snapshot::StoreSnapshot;
pub use user::{User, UserPatch};
