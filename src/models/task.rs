use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Value a task form sends for "assigned to no one".
pub const UNASSIGNED: &str = "unassigned";

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    #[default]
    Pending,
    Approved,
    Declined,
    Completed,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    pub description: String,
    pub assigned_to: Option<String>,
    pub assigned_by: String,
    pub status: TaskStatus,
    pub deadline: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    pub fn is_assigned_to(&self, user_id: &str) -> bool {
        self.assigned_to.as_deref() == Some(user_id)
    }
}

/// Fields of a task before the store gives it an id and timestamps.
#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub assigned_to: Option<String>,
    pub assigned_by: String,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub deadline: Option<NaiveDate>,
}

/// Partial update merged onto an existing task.
///
/// The nullable fields use a double `Option`: `None` leaves the field alone,
/// `Some(None)` clears it.
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct TaskUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub assigned_to: Option<Option<String>>,
    pub assigned_by: Option<String>,
    pub status: Option<TaskStatus>,
    #[serde(default, deserialize_with = "present")]
    pub deadline: Option<Option<NaiveDate>>,
}

impl TaskUpdate {
    pub fn status(status: TaskStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub(crate) fn apply(self, task: &mut Task) {
        if let Some(title) = self.title {
            task.title = title;
        }
        if let Some(description) = self.description {
            task.description = description;
        }
        if let Some(assigned_to) = self.assigned_to {
            task.assigned_to = normalize_assignee(assigned_to);
        }
        if let Some(assigned_by) = self.assigned_by {
            task.assigned_by = assigned_by;
        }
        if let Some(status) = self.status {
            task.status = status;
        }
        if let Some(deadline) = self.deadline {
            task.deadline = deadline;
        }
    }
}

// A field that is present maps to Some, even when it is null.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

pub(crate) fn normalize_assignee(assigned_to: Option<String>) -> Option<String> {
    assigned_to.filter(|id| id != UNASSIGNED)
}

/// Status filter of the task list. `active` is what the dashboard links use
/// for approved tasks.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TaskFilter {
    #[default]
    All,
    Pending,
    #[serde(alias = "active")]
    Approved,
    Declined,
    Completed,
}

impl TaskFilter {
    pub fn matches(self, task: &Task) -> bool {
        match self {
            TaskFilter::All => true,
            TaskFilter::Pending => task.status == TaskStatus::Pending,
            TaskFilter::Approved => task.status == TaskStatus::Approved,
            TaskFilter::Declined => task.status == TaskStatus::Declined,
            TaskFilter::Completed => task.status == TaskStatus::Completed,
        }
    }
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TaskSummary {
    pub total: usize,
    pub pending: usize,
    pub active: usize,
    pub completed: usize,
    pub declined: usize,
}

impl<'a> FromIterator<&'a Task> for TaskSummary {
    fn from_iter<I: IntoIterator<Item = &'a Task>>(tasks: I) -> Self {
        tasks.into_iter().fold(TaskSummary::default(), |mut summary, task| {
            summary.total += 1;
            match task.status {
                TaskStatus::Pending => summary.pending += 1,
                TaskStatus::Approved => summary.active += 1,
                TaskStatus::Completed => summary.completed += 1,
                TaskStatus::Declined => summary.declined += 1,
            }
            summary
        })
    }
}
