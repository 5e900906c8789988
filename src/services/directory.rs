//! Directory service - the collection of registered users
//!
//! Owns email uniqueness and id assignment. Every other component treats
//! the directory as the single source of truth for user records.

use std::sync::Arc;

use chrono::Local;

use crate::domain::result::{Error, FieldError, Result};
use crate::domain::{User, UserPatch};
use crate::services::{LogEvent, LoggingService};
use crate::store::Store;

/// Display format for a user's registration date
const REGISTER_DATE_FORMAT: &str = "%b %d, %Y";

/// Directory service for user registration and lookup
pub struct DirectoryService {
    store: Arc<Store>,
    logging: Arc<LoggingService>,
}

impl DirectoryService {
    pub fn new(store: Arc<Store>, logging: Arc<LoggingService>) -> Self {
        Self { store, logging }
    }

    /// Register a new user
    ///
    /// Fails with `EmailTaken` if the email is already in the directory.
    /// Ids are assigned from the persisted counter and never reused.
    pub async fn register(&self, name: &str, email: &str, password: &str) -> Result<User> {
        let mut fields = Vec::new();
        if name.trim().is_empty() {
            fields.push(FieldError::new("name", "Name cannot be empty"));
        }
        if email.trim().is_empty() {
            fields.push(FieldError::new("email", "Email cannot be empty"));
        }
        if password.is_empty() {
            fields.push(FieldError::new("password", "Password cannot be empty"));
        }
        if !fields.is_empty() {
            return Err(Error::InvalidInput(fields));
        }

        let name = name.to_string();
        let email = email.to_string();
        let password = password.to_string();

        let result = self
            .store
            .mutate(move |state| {
                if state.users.iter().any(|u| u.email == email) {
                    return Err(Error::EmailTaken);
                }

                let id = state.last_user_id + 1;
                let register_date = Local::now().format(REGISTER_DATE_FORMAT).to_string();
                let user = User::new(id, name, email, password, register_date);

                state.last_user_id = id;
                state.users.push(user.clone());
                Ok(user)
            })
            .await;

        match &result {
            // Log failures never fail the operation
            Ok(user) => {
                let _ = self
                    .logging
                    .log(LogEvent::new("user_registered").with_email(&user.email));
            }
            Err(e) => {
                let _ = self.logging.log_error("register_failed", &e.to_string());
            }
        }

        result
    }

    /// Look up a user by email and password
    ///
    /// Unknown email and wrong password both surface as
    /// `InvalidCredentials`; the caller cannot tell which part was wrong.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<User> {
        let found = self.find_by_email(email).await;
        match found {
            Some(user) if user.password == password => Ok(user),
            _ => Err(Error::InvalidCredentials),
        }
    }

    /// Look up a user by email (case-sensitive)
    pub async fn find_by_email(&self, email: &str) -> Option<User> {
        self.store
            .read(|state| state.users.iter().find(|u| u.email == email).cloned())
            .await
    }

    /// Whether an email is already registered
    pub async fn is_email_exist(&self, email: &str) -> bool {
        self.store
            .read(|state| state.users.iter().any(|u| u.email == email))
            .await
    }

    /// Shallow-merge a patch into a stored user
    ///
    /// Used for profile edits; balance and history sync goes through the
    /// wallet service.
    pub async fn update_user(&self, email: &str, patch: UserPatch) -> Result<User> {
        let email = email.to_string();
        self.store
            .mutate(move |state| {
                let user = state
                    .users
                    .iter_mut()
                    .find(|u| u.email == email)
                    .ok_or_else(|| Error::not_found(format!("no user with email {}", email)))?;
                patch.apply(user);
                let updated = user.clone();

                // Keep the session projection aligned with the directory
                if let Some(current) = &mut state.current_user {
                    if current.email == updated.email {
                        current.name = updated.name.clone();
                        current.avatar_text = updated.avatar_text.clone();
                    }
                }
                Ok(updated)
            })
            .await
    }

    /// Number of registered users
    pub async fn len(&self) -> usize {
        self.store.read(|state| state.users.len()).await
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryStore;

    fn service() -> DirectoryService {
        let store = Arc::new(Store::open(Box::new(InMemoryStore::new())).unwrap());
        DirectoryService::new(store, Arc::new(LoggingService::in_memory()))
    }

    #[tokio::test]
    async fn test_register_then_authenticate() {
        let directory = service();
        let user = directory
            .register("Ann", "ann@x.com", "secret1")
            .await
            .unwrap();
        assert_eq!(user.id, 1);
        assert_eq!(user.avatar_text, "A");
        assert!(directory.is_email_exist("ann@x.com").await);

        let authed = directory.authenticate("ann@x.com", "secret1").await.unwrap();
        assert_eq!(authed.id, user.id);
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let directory = service();
        directory
            .register("Ann", "ann@x.com", "secret1")
            .await
            .unwrap();

        let result = directory.register("Other Ann", "ann@x.com", "other").await;
        assert!(matches!(result, Err(Error::EmailTaken)));
        assert_eq!(directory.len().await, 1);
    }

    #[tokio::test]
    async fn test_invalid_credentials_are_indistinguishable() {
        let directory = service();
        directory
            .register("Ann", "ann@x.com", "secret1")
            .await
            .unwrap();

        let wrong_password = directory.authenticate("ann@x.com", "nope").await;
        let unknown_email = directory.authenticate("ghost@x.com", "secret1").await;

        let a = wrong_password.unwrap_err().to_string();
        let b = unknown_email.unwrap_err().to_string();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn test_ids_are_monotonic() {
        let directory = service();
        let ann = directory
            .register("Ann", "ann@x.com", "secret1")
            .await
            .unwrap();
        let bob = directory
            .register("Bob", "bob@x.com", "secret2")
            .await
            .unwrap();
        assert_eq!(ann.id, 1);
        assert_eq!(bob.id, 2);
    }

    #[tokio::test]
    async fn test_update_user_not_found() {
        let directory = service();
        let result = directory
            .update_user("ghost@x.com", UserPatch::default())
            .await;
        assert!(matches!(result, Err(Error::NotFound(_))));
    }

    #[tokio::test]
    async fn test_update_user_patches_name() {
        let directory = service();
        directory
            .register("Ann", "ann@x.com", "secret1")
            .await
            .unwrap();

        let patch = UserPatch {
            name: Some("Annie".to_string()),
            ..Default::default()
        };
        let updated = directory.update_user("ann@x.com", patch).await.unwrap();
        assert_eq!(updated.name, "Annie");
        assert_eq!(updated.avatar_text, "A");
        // Password untouched by a shallow patch
        assert_eq!(updated.password, "secret1");
    }

    #[tokio::test]
    async fn test_empty_fields_collected() {
        let directory = service();
        let result = directory.register("", "ann@x.com", "").await;
        match result {
            Err(Error::InvalidInput(fields)) => {
                assert_eq!(fields.len(), 2);
            }
            other => panic!("expected InvalidInput, got {:?}", other.map(|u| u.email)),
        }
    }
}
