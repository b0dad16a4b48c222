//! Task collection and the approval lifecycle.
//!
//! Lookups that miss and transitions whose guard fails are quiet no-ops: no
//! notification is raised and the method reports `false`.

use chrono::Utc;
use crate::models::{normalize_assignee, NewTask, Severity, Task, TaskStatus, TaskUpdate, User};
use super::notifier::Notifier;
use super::table::{Repository, Table};

pub struct TaskStore<R = Table<Task>> {
    tasks: R,
}

impl TaskStore<Table<Task>> {
    pub fn new(tasks: Vec<Task>) -> Self {
        Self {
            tasks: tasks.into_iter().collect(),
        }
    }
}

impl<R: Repository<Task>> TaskStore<R> {
    pub fn tasks(&self) -> &[Task] {
        self.tasks.rows()
    }

    pub fn get(&self, task_id: &str) -> Option<&Task> {
        self.tasks.get(task_id)
    }

    /// Creates a task. The caller picks the initial status; the "unassigned"
    /// form value is stored as no assignee.
    pub fn add_task(&mut self, new: NewTask, notifier: &mut dyn Notifier) -> Task {
        let now = Utc::now();
        let task = Task {
            id: uuid::Uuid::new_v4().to_string(),
            title: new.title,
            description: new.description,
            assigned_to: normalize_assignee(new.assigned_to),
            assigned_by: new.assigned_by,
            status: new.status,
            deadline: new.deadline,
            created_at: now,
            updated_at: now,
        };

        tracing::info!("Created task {} by {}", task.id, task.assigned_by);
        self.tasks.insert(task.clone());
        notifier.notify("Task created", "The task has been created successfully", Severity::Normal);
        task
    }

    pub fn update_task(&mut self, task_id: &str, update: TaskUpdate, notifier: &mut dyn Notifier) -> bool {
        if !self.merge(task_id, update) {
            return false;
        }
        notifier.notify("Task updated", "The task has been updated successfully", Severity::Normal);
        true
    }

    pub fn delete_task(&mut self, task_id: &str, notifier: &mut dyn Notifier) -> bool {
        match self.tasks.remove(task_id) {
            Some(task) => {
                tracing::info!("Deleted task {}", task.id);
                notifier.notify("Task deleted", "The task has been deleted successfully", Severity::Normal);
                true
            }
            None => {
                tracing::debug!("Delete of unknown task {} ignored", task_id);
                false
            }
        }
    }

    pub fn user_tasks(&self, user_id: &str) -> Vec<&Task> {
        self.tasks().iter().filter(|t| t.is_assigned_to(user_id)).collect()
    }

    pub fn admin_tasks(&self, admin_id: &str) -> Vec<&Task> {
        self.tasks().iter().filter(|t| t.assigned_by == admin_id).collect()
    }

    /// Admins see the tasks they assigned, everyone else what they were
    /// assigned.
    pub fn tasks_for(&self, user: &User) -> Vec<&Task> {
        if user.is_admin() {
            self.admin_tasks(&user.id)
        } else {
            self.user_tasks(&user.id)
        }
    }

    // Approve and decline only check the assignee, so they overwrite any
    // status. Complete additionally needs the task to be approved.

    pub fn approve_task(&mut self, task_id: &str, user_id: &str, notifier: &mut dyn Notifier) -> bool {
        if !self.transition(task_id, user_id, TaskStatus::Approved, |_| true) {
            return false;
        }
        notifier.notify("Task approved", "You have approved the task", Severity::Normal);
        true
    }

    pub fn decline_task(&mut self, task_id: &str, user_id: &str, notifier: &mut dyn Notifier) -> bool {
        if !self.transition(task_id, user_id, TaskStatus::Declined, |_| true) {
            return false;
        }
        notifier.notify("Task declined", "You have declined the task", Severity::Normal);
        true
    }

    pub fn complete_task(&mut self, task_id: &str, user_id: &str, notifier: &mut dyn Notifier) -> bool {
        let approved = |task: &Task| task.status == TaskStatus::Approved;
        if !self.transition(task_id, user_id, TaskStatus::Completed, approved) {
            return false;
        }
        notifier.notify("Task completed", "The task has been marked as completed", Severity::Normal);
        true
    }

    fn transition<F>(&mut self, task_id: &str, user_id: &str, to: TaskStatus, guard: F) -> bool
    where
        F: Fn(&Task) -> bool,
    {
        let allowed = self
            .tasks
            .get(task_id)
            .is_some_and(|task| task.is_assigned_to(user_id) && guard(task));
        if !allowed {
            tracing::debug!("Ignoring {:?} of task {} by user {}", to, task_id, user_id);
            return false;
        }
        self.merge(task_id, TaskUpdate::status(to))
    }

    fn merge(&mut self, task_id: &str, update: TaskUpdate) -> bool {
        let Some(task) = self.tasks.get_mut(task_id) else {
            tracing::debug!("Update of unknown task {} ignored", task_id);
            return false;
        };
        update.apply(task);
        task.updated_at = Utc::now();
        tracing::info!("Task {} now {:?}", task.id, task.status);
        true
    }
}

/// Tasks that have a deadline, soonest first.
pub fn upcoming_deadlines<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> Vec<&'a Task> {
    let mut dated: Vec<&Task> = tasks.into_iter().filter(|t| t.deadline.is_some()).collect();
    dated.sort_by_key(|t| t.deadline);
    dated
}

/// Who a message sent from a task's page goes to: an admin writes to the
/// assignee, anyone else to the admin who assigned it.
pub fn message_recipient<'a>(task: &'a Task, actor: &User) -> Option<&'a str> {
    if actor.is_admin() {
        task.assigned_to.as_deref()
    } else {
        Some(task.assigned_by.as_str())
    }
}
