// Role checks for routes. Assignee checks on approve/decline/complete are
// part of the task store itself and stay quiet on failure.
use crate::errors::{AppError, AppResult};
use crate::models::{Task, User};

#[derive(Debug, Clone, Copy)]
pub enum Action<'a> {
    CreateTask,
    UpdateTask(&'a str),
    DeleteTask(&'a str),
    ViewTask(&'a Task),
    ListMembers,
}

pub fn authorize(actor: &User, action: Action<'_>) -> AppResult<()> {
    let allowed = match action {
        Action::CreateTask | Action::ListMembers => actor.is_admin(),
        Action::UpdateTask(_) | Action::DeleteTask(_) => actor.is_admin(),
        Action::ViewTask(task) => {
            actor.is_admin() || task.assigned_by == actor.id || task.is_assigned_to(&actor.id)
        }
    };

    if allowed {
        Ok(())
    } else {
        tracing::warn!("User {} denied {:?}", actor.id, action);
        Err(AppError::Forbidden(describe(action)))
    }
}

fn describe(action: Action<'_>) -> String {
    match action {
        Action::CreateTask => "only admins can create tasks".into(),
        Action::UpdateTask(task_id) => format!("only admins can edit task {}", task_id),
        Action::DeleteTask(task_id) => format!("only admins can delete task {}", task_id),
        Action::ViewTask(task) => format!("task {} is not assigned to or by you", task.id),
        Action::ListMembers => "only admins can list users".into(),
    }
}
