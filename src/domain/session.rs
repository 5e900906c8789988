//! Session domain model

use serde::{Deserialize, Serialize};

use super::User;

/// Read-mostly projection of the authenticated user
///
/// Never carries the password. Derived from the directory record at login
/// or restore; a projection is never mutated independently of its source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUser {
    pub name: String,
    pub email: String,
    pub avatar_text: String,
}

impl From<&User> for CurrentUser {
    fn from(user: &User) -> Self {
        Self {
            name: user.name.clone(),
            email: user.email.clone(),
            avatar_text: user.avatar_text.clone(),
        }
    }
}
