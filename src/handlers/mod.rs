mod auth;
mod tasks;
mod messages;
mod users;
mod dashboard;

pub use auth::{handle_login, handle_signup, handle_logout, current_profile, health};
pub use tasks::{
    list_tasks, create_task, view_task, update_task, delete_task,
    approve_task, decline_task, complete_task, message_about_task,
};
pub use messages::{list_conversations, conversation_messages, mark_conversation_read, send_message};
pub use users::{list_members, view_user};
pub use dashboard::{serve_dashboard, serve_calendar};

#[cfg(test)]
mod tests;
