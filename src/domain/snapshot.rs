//! Whole-store snapshot
//!
//! The persisted shape is compatible with the existing view layer's
//! expectations: camelCase keys, and the redundant `userBalance` /
//! `depositHistory` mirrors of the current user's directory record. The
//! mirrors are written on save and reconciled toward the directory on load;
//! the directory always wins.

use serde::{Deserialize, Serialize};

use super::{CurrentUser, Deposit, User};

/// Full serialized state of the store at a point in time
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreSnapshot {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_user: Option<CurrentUser>,
    /// Mirror of the current user's balance, derived at save time
    #[serde(default)]
    pub user_balance: i64,
    /// Mirror of the current user's deposit history, derived at save time
    #[serde(default)]
    pub deposit_history: Vec<Deposit>,
    #[serde(default)]
    pub last_user_id: u64,
    #[serde(default)]
    pub remember_me: bool,
}

impl StoreSnapshot {
    /// Derive the mirror fields from the directory
    ///
    /// Called before every save so the persisted mirrors can never drift
    /// from `users[].balance` / `users[].deposit_history`.
    pub fn sync_mirrors(&mut self) {
        let current = self
            .current_user
            .as_ref()
            .and_then(|cu| self.users.iter().find(|u| u.email == cu.email));
        match current {
            Some(user) => {
                self.user_balance = user.balance;
                self.deposit_history = user.deposit_history.clone();
            }
            None => {
                self.user_balance = 0;
                self.deposit_history = Vec::new();
            }
        }
    }

    /// Reconcile a loaded snapshot: drop a dangling current-user reference
    /// and rebuild the mirrors from the directory
    pub fn reconcile(&mut self) {
        if let Some(cu) = &self.current_user {
            if !self.users.iter().any(|u| u.email == cu.email) {
                self.current_user = None;
            }
        }
        // last_user_id must never fall behind an existing id
        let max_id = self.users.iter().map(|u| u.id).max().unwrap_or(0);
        if self.last_user_id < max_id {
            self.last_user_id = max_id;
        }
        self.sync_mirrors();
    }
}
