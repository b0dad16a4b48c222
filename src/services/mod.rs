pub mod table;
pub mod notifier;
pub mod seed;
pub mod users;
pub mod session_store;
pub mod session_slot;
pub mod task_store;
pub mod message_store;
pub mod policy;

pub use notifier::Toasts;
pub use seed::Dataset;
pub use users::UserDirectory;
pub use session_store::SessionStore;
pub use session_slot::SessionSlot;
pub use task_store::TaskStore;
pub use message_store::MessageStore;
