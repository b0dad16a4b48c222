use axum::{
    extract::{Extension, Json, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use crate::errors::{AppError, AppResult};
use crate::middleware::CurrentUser;
use crate::models::{NewTaskForm, Task, TaskMessageForm, TaskQuery, TaskUpdate, UserProfile, UserRole, UNASSIGNED};
use crate::services::policy::{self, Action};
use crate::services::task_store::message_recipient;
use crate::services::Toasts;
use crate::state::AppState;

#[derive(Debug, Clone, Copy)]
enum Transition {
    Approve,
    Decline,
    Complete,
}

pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Query(query): Query<TaskQuery>,
) -> Response {
    let tasks: Vec<Task> = state
        .tasks
        .read()
        .tasks_for(&user)
        .into_iter()
        .filter(|t| query.filter.matches(t))
        .cloned()
        .collect();

    tracing::debug!("Listing {} tasks for user {}", tasks.len(), user.id);
    Json(json!({ "tasks": tasks })).into_response()
}

pub async fn create_task(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(form): Json<NewTaskForm>,
) -> AppResult<Response> {
    policy::authorize(&user, Action::CreateTask)?;

    if form.title.trim().is_empty() || form.description.trim().is_empty() {
        return Err(AppError::Validation("title and description are required".into()));
    }
    check_assignee(&state, form.assigned_to.as_deref())?;

    let mut toasts = Toasts::new();
    let task = state.tasks.write().add_task(form.into_task(&user.id), &mut toasts);

    Ok((StatusCode::CREATED, Json(json!({
        "task": task,
        "notifications": toasts.into_inner(),
    }))).into_response())
}

pub async fn view_task(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(task_id): Path<String>,
) -> AppResult<Response> {
    let task = state
        .tasks
        .read()
        .get(&task_id)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("Task {} not found", task_id)))?;
    policy::authorize(&user, Action::ViewTask(&task))?;

    let assignee = task
        .assigned_to
        .as_deref()
        .and_then(|id| state.users.get(id))
        .map(|u| UserProfile::from(&u));
    let assigner = state.users.get(&task.assigned_by).map(|u| UserProfile::from(&u));

    Ok(Json(json!({
        "task": task,
        "assignee": assignee,
        "assigner": assigner,
    })).into_response())
}

pub async fn update_task(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(task_id): Path<String>,
    Json(update): Json<TaskUpdate>,
) -> AppResult<Response> {
    policy::authorize(&user, Action::UpdateTask(&task_id))?;

    if let Some(assigned_to) = &update.assigned_to {
        check_assignee(&state, assigned_to.as_deref())?;
    }
    if let Some(assigned_by) = &update.assigned_by {
        let is_admin = state.users.get(assigned_by).is_some_and(|u| u.is_admin());
        if !is_admin {
            return Err(AppError::Validation(format!("tasks can only be assigned by an admin, not {}", assigned_by)));
        }
    }

    let mut toasts = Toasts::new();
    let task = {
        let mut tasks = state.tasks.write();
        if !tasks.update_task(&task_id, update, &mut toasts) {
            return Err(AppError::NotFound(format!("Task {} not found", task_id)));
        }
        tasks.get(&task_id).cloned()
    };

    Ok(Json(json!({
        "task": task,
        "notifications": toasts.into_inner(),
    })).into_response())
}

pub async fn delete_task(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(task_id): Path<String>,
) -> AppResult<Response> {
    tracing::info!("Attempting to delete task {} for user {}", task_id, user.id);

    policy::authorize(&user, Action::DeleteTask(&task_id))?;

    let mut toasts = Toasts::new();
    let deleted = state.tasks.write().delete_task(&task_id, &mut toasts);

    Ok(Json(json!({
        "deleted": deleted,
        "notifications": toasts.into_inner(),
    })).into_response())
}

pub async fn approve_task(
    state: State<AppState>,
    current: Extension<CurrentUser>,
    task_id: Path<String>,
) -> Response {
    respond_to_task(state, current, task_id, Transition::Approve)
}

pub async fn decline_task(
    state: State<AppState>,
    current: Extension<CurrentUser>,
    task_id: Path<String>,
) -> Response {
    respond_to_task(state, current, task_id, Transition::Decline)
}

pub async fn complete_task(
    state: State<AppState>,
    current: Extension<CurrentUser>,
    task_id: Path<String>,
) -> Response {
    respond_to_task(state, current, task_id, Transition::Complete)
}

// A transition whose guard fails is not an error: the task comes back as it
// was, with `applied` false and no notifications.
fn respond_to_task(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(task_id): Path<String>,
    transition: Transition,
) -> Response {
    let mut toasts = Toasts::new();
    let (applied, task) = {
        let mut tasks = state.tasks.write();
        let applied = match transition {
            Transition::Approve => tasks.approve_task(&task_id, &user.id, &mut toasts),
            Transition::Decline => tasks.decline_task(&task_id, &user.id, &mut toasts),
            Transition::Complete => tasks.complete_task(&task_id, &user.id, &mut toasts),
        };
        (applied, tasks.get(&task_id).cloned())
    };

    tracing::debug!("{:?} of task {} by {}: applied={}", transition, task_id, user.id, applied);
    Json(json!({
        "applied": applied,
        "task": task,
        "notifications": toasts.into_inner(),
    })).into_response()
}

// Tasks go to existing members only; `None` and the "unassigned" value
// always pass.
fn check_assignee(state: &AppState, assigned_to: Option<&str>) -> AppResult<()> {
    let Some(assignee) = assigned_to.filter(|id| *id != UNASSIGNED) else {
        return Ok(());
    };
    let assignable = state
        .users
        .get(assignee)
        .is_some_and(|u| u.role == UserRole::User);
    if assignable {
        Ok(())
    } else {
        Err(AppError::Validation(format!("user {} cannot be assigned tasks", assignee)))
    }
}

/// Message sent from a task's page, routed by the actor's role.
pub async fn message_about_task(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(task_id): Path<String>,
    Json(form): Json<TaskMessageForm>,
) -> AppResult<Response> {
    if form.content.trim().is_empty() {
        return Err(AppError::Validation("message is empty".into()));
    }

    let recipient = {
        let tasks = state.tasks.read();
        let task = tasks
            .get(&task_id)
            .ok_or_else(|| AppError::NotFound(format!("Task {} not found", task_id)))?;
        policy::authorize(&user, Action::ViewTask(task))?;
        message_recipient(task, &user).map(String::from)
    };
    let recipient = recipient
        .ok_or_else(|| AppError::Validation(format!("Task {} has no assignee to message", task_id)))?;

    let mut toasts = Toasts::new();
    let message = state
        .messages
        .write()
        .send_message(&user.id, &recipient, &form.content, &mut toasts);

    Ok((StatusCode::CREATED, Json(json!({
        "message": message,
        "notifications": toasts.into_inner(),
    }))).into_response())
}
