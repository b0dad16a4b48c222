// Sample records the service boots with when `seed.enabled` is set.
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use crate::models::{Conversation, Message, Task, TaskStatus, User, UserRole};

#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub users: Vec<User>,
    pub tasks: Vec<Task>,
    pub messages: Vec<Message>,
    pub conversations: Vec<Conversation>,
}

impl Dataset {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn sample() -> Self {
        let messages = messages();
        let conversations = conversations(&messages);
        Self {
            users: users(),
            tasks: tasks(),
            messages,
            conversations,
        }
    }
}

fn at(year: i32, month: u32, day: u32, hour: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, min, 0)
        .single()
        .unwrap_or_default()
}

fn day(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    at(year, month, day, 0, 0)
}

fn user(id: &str, name: &str, email: &str, password: &str, role: UserRole, created_at: DateTime<Utc>) -> User {
    User {
        id: id.into(),
        name: name.into(),
        email: email.into(),
        password: password.into(),
        role,
        created_at,
    }
}

fn users() -> Vec<User> {
    vec![
        user("1", "Admin User", "admin@devtask.com", "admin123", UserRole::Admin, day(2023, 1, 1)),
        user("2", "John Developer", "john@devtask.com", "john123", UserRole::User, day(2023, 1, 5)),
        user("3", "Sarah Designer", "sarah@devtask.com", "sarah123", UserRole::User, day(2023, 1, 10)),
    ]
}

#[allow(clippy::too_many_arguments)]
fn task(
    id: &str,
    title: &str,
    description: &str,
    assigned_to: Option<&str>,
    status: TaskStatus,
    deadline: Option<NaiveDate>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
) -> Task {
    Task {
        id: id.into(),
        title: title.into(),
        description: description.into(),
        assigned_to: assigned_to.map(String::from),
        assigned_by: "1".into(),
        status,
        deadline,
        created_at,
        updated_at,
    }
}

fn tasks() -> Vec<Task> {
    vec![
        task(
            "1",
            "Implement User Authentication",
            "Create login, signup, and password reset functionality.",
            Some("2"),
            TaskStatus::Approved,
            NaiveDate::from_ymd_opt(2023, 2, 20),
            day(2023, 2, 1),
            day(2023, 2, 1),
        ),
        task(
            "2",
            "Design Landing Page",
            "Create a responsive landing page with modern design.",
            Some("3"),
            TaskStatus::Completed,
            NaiveDate::from_ymd_opt(2023, 2, 15),
            day(2023, 2, 1),
            day(2023, 2, 15),
        ),
        task(
            "3",
            "API Integration",
            "Connect frontend with backend APIs.",
            Some("2"),
            TaskStatus::Pending,
            NaiveDate::from_ymd_opt(2023, 3, 1),
            day(2023, 2, 10),
            day(2023, 2, 10),
        ),
        task(
            "4",
            "UI Component Library",
            "Build reusable UI components for the application.",
            None,
            TaskStatus::Pending,
            NaiveDate::from_ymd_opt(2023, 3, 10),
            day(2023, 2, 15),
            day(2023, 2, 15),
        ),
    ]
}

fn message(id: &str, sender: &str, receiver: &str, content: &str, read: bool, created_at: DateTime<Utc>) -> Message {
    Message {
        id: id.into(),
        sender_id: sender.into(),
        receiver_id: receiver.into(),
        content: content.into(),
        read,
        created_at,
    }
}

fn messages() -> Vec<Message> {
    vec![
        message("1", "1", "2", "How is the authentication task coming along?", true, at(2023, 2, 5, 10, 30)),
        message("2", "2", "1", "Almost done! Just testing edge cases now.", true, at(2023, 2, 5, 10, 35)),
        message("3", "1", "3", "Have you started on the landing page design?", true, at(2023, 2, 3, 14, 20)),
        message("4", "3", "1", "Yes, I'll send you the mockups later today.", false, at(2023, 2, 3, 15, 45)),
    ]
}

fn conversations(messages: &[Message]) -> Vec<Conversation> {
    let last = |id: &str| messages.iter().find(|m| m.id == id).cloned();
    vec![
        Conversation {
            id: "1".into(),
            participants: ["1".into(), "2".into()],
            last_message: last("2"),
            updated_at: at(2023, 2, 5, 10, 35),
        },
        Conversation {
            id: "2".into(),
            participants: ["1".into(), "3".into()],
            last_message: last("4"),
            updated_at: at(2023, 2, 3, 15, 45),
        },
    ]
}
