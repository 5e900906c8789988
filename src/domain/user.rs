//! User domain model

use serde::{Deserialize, Serialize};

use super::Deposit;

/// A registered storefront user
///
/// The directory is the single source of truth for `balance` and
/// `deposit_history`; every other copy (session projection, persisted
/// mirror fields) is derived from this record.
///
/// Note: `password` is an opaque string compared by equality, matching the
/// documented contract of authenticate/change_password. A hardened port
/// would swap this for a salted hash, but that is a deliberate deviation
/// from the observable behavior, not implied here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub password: String,
    /// First character of the name, uppercased; shown in the avatar badge
    pub avatar_text: String,
    pub balance: i64,
    /// Newest first
    #[serde(default)]
    pub deposit_history: Vec<Deposit>,
    pub register_date: String,
}

impl User {
    /// Create a new user with a fresh id and empty ledger
    pub fn new(
        id: u64,
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
        register_date: impl Into<String>,
    ) -> Self {
        let name = name.into();
        Self {
            avatar_text: Self::derive_avatar_text(&name),
            id,
            name,
            email: email.into(),
            password: password.into(),
            balance: 0,
            deposit_history: Vec::new(),
            register_date: register_date.into(),
        }
    }

    /// First character of the name, uppercased (empty name yields empty text)
    pub fn derive_avatar_text(name: &str) -> String {
        name.chars()
            .next()
            .map(|c| c.to_uppercase().to_string())
            .unwrap_or_default()
    }

    /// Validate registration input
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.name.trim().is_empty() {
            return Err("name cannot be empty");
        }
        if self.email.trim().is_empty() {
            return Err("email cannot be empty");
        }
        if self.password.is_empty() {
            return Err("password cannot be empty");
        }
        Ok(())
    }
}

/// Shallow patch for `update_user`; only the present fields are applied
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPatch {
    pub name: Option<String>,
    pub password: Option<String>,
    pub balance: Option<i64>,
    pub deposit_history: Option<Vec<Deposit>>,
}

impl UserPatch {
    /// Apply the patch to a user record, keeping derived fields consistent
    pub fn apply(&self, user: &mut User) {
        if let Some(name) = &self.name {
            user.name = name.clone();
            user.avatar_text = User::derive_avatar_text(name);
        }
        if let Some(password) = &self.password {
            user.password = password.clone();
        }
        if let Some(balance) = self.balance {
            user.balance = balance;
        }
        if let Some(history) = &self.deposit_history {
            user.deposit_history = history.clone();
        }
    }
}
