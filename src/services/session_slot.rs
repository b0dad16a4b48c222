use tower_sessions::Session;
use super::session_store::SessionPersistence;

enum Change {
    Save(String),
    Clear,
}

/// Synchronous view of one key in a cookie session.
///
/// The stores are synchronous while `tower_sessions::Session` is not, so the
/// value is read before a store operation runs and any change is written back
/// with [`SessionSlot::commit`] afterwards.
pub struct SessionSlot {
    session: Session,
    key: String,
    value: Option<String>,
    change: Option<Change>,
}

impl SessionSlot {
    /// Reads `key` from the session. A value that cannot be read is treated
    /// as absent and scheduled for removal.
    pub async fn load(session: &Session, key: &str) -> Self {
        let (value, change) = match session.get::<String>(key).await {
            Ok(value) => (value, None),
            Err(e) => {
                tracing::warn!("Unreadable session value under {}: {}", key, e);
                (None, Some(Change::Clear))
            }
        };

        Self {
            session: session.clone(),
            key: key.to_string(),
            value,
            change,
        }
    }

    pub async fn commit(self) -> Result<(), tower_sessions::session::Error> {
        match self.change {
            Some(Change::Save(value)) => self.session.insert(&self.key, value).await,
            Some(Change::Clear) => {
                self.session.remove::<serde_json::Value>(&self.key).await?;
                Ok(())
            }
            None => Ok(()),
        }
    }
}

impl SessionPersistence for SessionSlot {
    fn save(&mut self, key: &str, value: String) {
        debug_assert_eq!(key, self.key);
        self.value = Some(value.clone());
        self.change = Some(Change::Save(value));
    }

    fn load(&self, key: &str) -> Option<String> {
        if key == self.key {
            self.value.clone()
        } else {
            None
        }
    }

    fn clear(&mut self, key: &str) {
        debug_assert_eq!(key, self.key);
        self.value = None;
        self.change = Some(Change::Clear);
    }
}
