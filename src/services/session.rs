//! Session service - the at-most-one authenticated user
//!
//! A small state machine: `Anonymous` until a successful login, back to
//! `Anonymous` on logout. The current user is a projection of the directory
//! record; it never carries the password and is never mutated on its own.

use std::sync::Arc;

use crate::domain::result::{Error, Result};
use crate::domain::CurrentUser;
use crate::services::{LogEvent, LoggingService};
use crate::store::Store;

/// Session service for login, logout, restore, and password changes
pub struct SessionService {
    store: Arc<Store>,
    logging: Arc<LoggingService>,
}

impl SessionService {
    pub fn new(store: Arc<Store>, logging: Arc<LoggingService>) -> Self {
        Self { store, logging }
    }

    /// Authenticate and open a session
    ///
    /// `remember` persists the session across restarts; it has its own
    /// lifetime, independent of the session itself.
    pub async fn login(&self, email: &str, password: &str, remember: bool) -> Result<CurrentUser> {
        let email = email.to_string();
        let password = password.to_string();

        let result = self
            .store
            .mutate(move |state| {
                let user = state
                    .users
                    .iter()
                    .find(|u| u.email == email && u.password == password)
                    .ok_or(Error::InvalidCredentials)?;

                let current = CurrentUser::from(user);
                state.current_user = Some(current.clone());
                state.remember_me = remember;
                Ok(current)
            })
            .await;

        match &result {
            Ok(current) => {
                let _ = self
                    .logging
                    .log(LogEvent::new("login_succeeded").with_email(&current.email));
            }
            Err(e) => {
                let _ = self.logging.log_error("login_failed", &e.to_string());
            }
        }

        result
    }

    /// Close the session
    ///
    /// Clears the current user and the remember flag; the balance
    /// projection in the snapshot resets to 0. The directory record is
    /// untouched.
    pub async fn logout(&self) -> Result<()> {
        let logged_out = self
            .store
            .mutate(|state| {
                let email = state.current_user.take().map(|cu| cu.email);
                state.remember_me = false;
                Ok(email)
            })
            .await?;

        if let Some(email) = logged_out {
            let _ = self
                .logging
                .log(LogEvent::new("logout").with_email(email));
        }
        Ok(())
    }

    /// Restore a remembered session from the persisted snapshot
    ///
    /// Trust-on-restore: the password is not re-validated. This mirrors the
    /// documented contract of the persisted `rememberMe` flag and is a known
    /// weak point, not something to harden here.
    pub async fn restore(&self) -> Option<CurrentUser> {
        self.store
            .read(|state| {
                if state.remember_me {
                    state.current_user.clone()
                } else {
                    None
                }
            })
            .await
    }

    /// The current session's user projection, if authenticated
    pub async fn current_user(&self) -> Option<CurrentUser> {
        self.store.read(|state| state.current_user.clone()).await
    }

    /// Change the authenticated user's password
    ///
    /// `WrongPassword` is deliberately distinct from the login error: the
    /// caller is already authenticated, so nothing is leaked by saying
    /// which check failed.
    pub async fn change_password(&self, current_password: &str, new_password: &str) -> Result<()> {
        let current_password = current_password.to_string();
        let new_password = new_password.to_string();

        let result = self
            .store
            .mutate(move |state| {
                let email = state
                    .current_user
                    .as_ref()
                    .map(|cu| cu.email.clone())
                    .ok_or(Error::NotAuthenticated)?;

                let user = state
                    .users
                    .iter_mut()
                    .find(|u| u.email == email)
                    .ok_or_else(|| Error::not_found(format!("no user with email {}", email)))?;

                if user.password != current_password {
                    return Err(Error::WrongPassword);
                }

                user.password = new_password;
                Ok(email)
            })
            .await;

        match result {
            Ok(email) => {
                let _ = self
                    .logging
                    .log(LogEvent::new("password_changed").with_email(email));
                Ok(())
            }
            Err(e) => {
                let _ = self
                    .logging
                    .log_error("password_change_failed", &e.to_string());
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryStore;
    use crate::domain::StoreSnapshot;
    use crate::domain::User;

    fn services() -> (SessionService, Arc<Store>) {
        let store = Arc::new(Store::open(Box::new(InMemoryStore::new())).unwrap());
        let session = SessionService::new(Arc::clone(&store), Arc::new(LoggingService::in_memory()));
        (session, store)
    }

    async fn seed_ann(store: &Store) {
        store
            .mutate(|state| {
                state
                    .users
                    .push(User::new(1, "Ann", "ann@x.com", "secret1", "2024-01-01"));
                state.last_user_id = 1;
                Ok(())
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_login_records_projection() {
        let (session, store) = services();
        seed_ann(&store).await;

        let current = session.login("ann@x.com", "secret1", true).await.unwrap();
        assert_eq!(current.name, "Ann");
        assert_eq!(current.avatar_text, "A");
        assert_eq!(session.current_user().await, Some(current));
    }

    #[tokio::test]
    async fn test_login_failure_leaves_anonymous() {
        let (session, store) = services();
        seed_ann(&store).await;

        let result = session.login("ann@x.com", "wrong", false).await;
        assert!(matches!(result, Err(Error::InvalidCredentials)));
        assert!(session.current_user().await.is_none());
    }

    #[tokio::test]
    async fn test_logout_clears_session_not_directory() {
        let (session, store) = services();
        seed_ann(&store).await;
        session.login("ann@x.com", "secret1", true).await.unwrap();

        session.logout().await.unwrap();

        assert!(session.current_user().await.is_none());
        assert!(!store.read(|s| s.remember_me).await);
        assert_eq!(store.read(|s| s.user_balance).await, 0);
        // Directory record survives logout
        assert_eq!(store.read(|s| s.users.len()).await, 1);
    }

    #[tokio::test]
    async fn test_restore_requires_remember_me() {
        let ann = User::new(1, "Ann", "ann@x.com", "secret1", "2024-01-01");
        let current = CurrentUser::from(&ann);

        let mut remembered = StoreSnapshot {
            users: vec![ann.clone()],
            current_user: Some(current.clone()),
            last_user_id: 1,
            remember_me: true,
            ..Default::default()
        };
        remembered.sync_mirrors();

        let store = Arc::new(
            Store::open(Box::new(InMemoryStore::with_snapshot(remembered.clone()))).unwrap(),
        );
        let session = SessionService::new(Arc::clone(&store), Arc::new(LoggingService::in_memory()));
        assert_eq!(session.restore().await, Some(current));

        remembered.remember_me = false;
        let store =
            Arc::new(Store::open(Box::new(InMemoryStore::with_snapshot(remembered))).unwrap());
        let session = SessionService::new(store, Arc::new(LoggingService::in_memory()));
        assert!(session.restore().await.is_none());
    }

    #[tokio::test]
    async fn test_change_password_wrong_current() {
        let (session, store) = services();
        seed_ann(&store).await;
        session.login("ann@x.com", "secret1", false).await.unwrap();

        let result = session.change_password("not-it", "newpass").await;
        assert!(matches!(result, Err(Error::WrongPassword)));

        // Stored password unchanged; the old one still authenticates
        let stored = store
            .read(|s| s.users[0].password.clone())
            .await;
        assert_eq!(stored, "secret1");
    }

    #[tokio::test]
    async fn test_change_password_success() {
        let (session, store) = services();
        seed_ann(&store).await;
        session.login("ann@x.com", "secret1", false).await.unwrap();

        session.change_password("secret1", "newpass").await.unwrap();
        let stored = store.read(|s| s.users[0].password.clone()).await;
        assert_eq!(stored, "newpass");
    }

    #[tokio::test]
    async fn test_change_password_requires_session() {
        let (session, store) = services();
        seed_ann(&store).await;

        let result = session.change_password("secret1", "newpass").await;
        assert!(matches!(result, Err(Error::NotAuthenticated)));
    }
}
