//! The single active session of one client.
//!
//! A [`SessionStore`] is either anonymous or holds the authenticated user.
//! The user record is persisted through a [`SessionPersistence`] collaborator
//! so the session survives between requests, and restored from it on
//! construction.

use std::collections::HashMap;
use crate::models::{Severity, User, UserRole};
use super::notifier::Notifier;
use super::users::UserDirectory;

/// Key-value slot the session user is persisted in.
pub trait SessionPersistence {
    fn save(&mut self, key: &str, value: String);
    fn load(&self, key: &str) -> Option<String>;
    fn clear(&mut self, key: &str);
}

impl SessionPersistence for HashMap<String, String> {
    fn save(&mut self, key: &str, value: String) {
        self.insert(key.to_string(), value);
    }

    fn load(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }

    fn clear(&mut self, key: &str) {
        self.remove(key);
    }
}

pub struct SessionStore<P> {
    users: UserDirectory,
    persistence: P,
    key: String,
    current_user: Option<User>,
}

impl<P: SessionPersistence> SessionStore<P> {
    /// Opens the session, restoring a previously persisted user if there is
    /// one. A value that does not decode as a user is discarded and the
    /// session starts anonymous.
    pub fn restore(users: UserDirectory, mut persistence: P, key: &str) -> Self {
        let current_user = match persistence.load(key) {
            Some(raw) => match serde_json::from_str::<User>(&raw) {
                Ok(user) => {
                    tracing::debug!("Restored session for user {}", user.id);
                    Some(user)
                }
                Err(e) => {
                    tracing::warn!("Discarding malformed session: {}", e);
                    persistence.clear(key);
                    None
                }
            },
            None => None,
        };

        Self {
            users,
            persistence,
            key: key.to_string(),
            current_user,
        }
    }

    pub fn login(&mut self, email: &str, password: &str, notifier: &mut dyn Notifier) -> bool {
        match self.users.find_by_credentials(email, password) {
            Some(user) => {
                tracing::info!("Login successful for user {}", user.id);
                notifier.notify(
                    "Login successful",
                    &format!("Welcome back, {}!", user.name),
                    Severity::Normal,
                );
                self.authenticate(user);
                true
            }
            None => {
                tracing::info!("Login failed for {}", email);
                notifier.notify("Login failed", "Invalid email or password", Severity::Destructive);
                false
            }
        }
    }

    pub fn signup(
        &mut self,
        name: &str,
        email: &str,
        password: &str,
        role: UserRole,
        notifier: &mut dyn Notifier,
    ) -> bool {
        match self.users.register(name, email, password, role) {
            Some(user) => {
                tracing::info!("Registered user {} as {:?}", user.id, role);
                notifier.notify(
                    "Signup successful",
                    &format!("Welcome to DevTask, {}!", name),
                    Severity::Normal,
                );
                self.authenticate(user);
                true
            }
            None => {
                tracing::info!("Signup rejected, email {} already in use", email);
                notifier.notify("Signup failed", "Email is already in use", Severity::Destructive);
                false
            }
        }
    }

    pub fn logout(&mut self, notifier: &mut dyn Notifier) {
        if let Some(user) = self.current_user.take() {
            tracing::info!("User {} logged out", user.id);
        }
        self.persistence.clear(&self.key);
        notifier.notify("Logged out", "You have been logged out successfully", Severity::Normal);
    }

    pub fn current_user(&self) -> Option<&User> {
        self.current_user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.current_user.is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.current_user.as_ref().is_some_and(User::is_admin)
    }

    pub fn into_persistence(self) -> P {
        self.persistence
    }

    fn authenticate(&mut self, user: User) {
        match serde_json::to_string(&user) {
            Ok(raw) => self.persistence.save(&self.key, raw),
            // Still signed in for this request, just not remembered.
            Err(e) => tracing::error!("Failed to persist session for {}: {}", user.id, e),
        }
        self.current_user = Some(user);
    }
}
