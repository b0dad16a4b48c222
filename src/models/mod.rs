mod user;
mod forms;
mod task;
mod message;
mod notification;

pub use user::{User, UserProfile, UserRole};
pub use forms::{LoginForm, MemberQuery, NewTaskForm, SendMessageForm, SignupForm, TaskMessageForm, TaskQuery};
pub use task::{NewTask, Task, TaskFilter, TaskStatus, TaskSummary, TaskUpdate, UNASSIGNED};
pub(crate) use task::normalize_assignee;
pub use message::{Conversation, Message};
pub use notification::{Notification, Severity};
