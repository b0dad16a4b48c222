use std::sync::Arc;
use parking_lot::RwLock;
use crate::config::Config;
use crate::services::{Dataset, MessageStore, TaskStore, UserDirectory};

// Application state shared between handlers. Store locks are only taken
// inside synchronous sections and never held across an await.
#[derive(Clone)]
pub struct AppState {
    pub users: UserDirectory,
    pub tasks: Arc<RwLock<TaskStore>>,
    pub messages: Arc<RwLock<MessageStore>>,
    pub config: Config,
}

impl AppState {
    pub fn new(data: Dataset, config: Config) -> Self {
        let users = UserDirectory::new(data.users);
        let messages = MessageStore::new(data.messages, data.conversations, users.clone());

        Self {
            users,
            tasks: Arc::new(RwLock::new(TaskStore::new(data.tasks))),
            messages: Arc::new(RwLock::new(messages)),
            config,
        }
    }
}
