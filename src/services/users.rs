use std::sync::Arc;
use chrono::Utc;
use parking_lot::RwLock;
use crate::models::{User, UserRole};
use super::table::{Repository, Table};

/// The shared user collection. Read by every store, appended to by signup.
#[derive(Clone, Default)]
pub struct UserDirectory {
    users: Arc<RwLock<Table<User>>>,
}

impl UserDirectory {
    pub fn new(users: Vec<User>) -> Self {
        Self {
            users: Arc::new(RwLock::new(users.into_iter().collect())),
        }
    }

    pub fn get(&self, user_id: &str) -> Option<User> {
        self.users.read().get(user_id).cloned()
    }

    /// Exact, case-sensitive match on both email and password.
    pub fn find_by_credentials(&self, email: &str, password: &str) -> Option<User> {
        self.users
            .read()
            .rows()
            .iter()
            .find(|u| u.email == email && u.password == password)
            .cloned()
    }

    /// Adds a new user unless the email is already in use.
    ///
    /// The check and the insert happen under one write lock, so two signups
    /// racing for the same email cannot both succeed.
    pub fn register(&self, name: &str, email: &str, password: &str, role: UserRole) -> Option<User> {
        let mut users = self.users.write();
        if users.rows().iter().any(|u| u.email == email) {
            return None;
        }

        let user = User {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            role,
            created_at: Utc::now(),
        };
        users.insert(user.clone());
        Some(user)
    }

    pub fn all(&self) -> Vec<User> {
        self.users.read().rows().to_vec()
    }

    /// Non-admin users whose name or email contains `search`, ignoring case.
    /// These are also the users a task can be assigned to.
    pub fn members(&self, search: Option<&str>) -> Vec<User> {
        let needle = search.map(str::to_lowercase).unwrap_or_default();
        self.users
            .read()
            .rows()
            .iter()
            .filter(|u| u.role == UserRole::User)
            .filter(|u| {
                u.name.to_lowercase().contains(&needle) || u.email.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect()
    }
}
