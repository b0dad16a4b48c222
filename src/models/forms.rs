use serde::Deserialize;
use super::{NewTask, TaskFilter, UserRole};

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct SignupForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: UserRole,
}

/// Task form as an admin submits it. `assignedBy` is taken from the session.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTaskForm {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub assigned_to: Option<String>,
    #[serde(default)]
    pub deadline: Option<chrono::NaiveDate>,
}

impl NewTaskForm {
    pub fn into_task(self, assigned_by: &str) -> NewTask {
        NewTask {
            title: self.title,
            description: self.description,
            assigned_to: self.assigned_to,
            assigned_by: assigned_by.to_string(),
            status: Default::default(),
            deadline: self.deadline,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageForm {
    pub receiver_id: String,
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct TaskMessageForm {
    pub content: String,
}

#[derive(Debug, Deserialize, Default)]
pub struct TaskQuery {
    #[serde(default)]
    pub filter: TaskFilter,
}

#[derive(Debug, Deserialize, Default)]
pub struct MemberQuery {
    pub search: Option<String>,
}
