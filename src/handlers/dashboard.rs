use axum::{
    extract::{Extension, Json, State},
    response::{IntoResponse, Response},
};
use serde_json::json;
use crate::middleware::CurrentUser;
use crate::models::{Task, TaskFilter, TaskSummary, UserProfile};
use crate::services::task_store::upcoming_deadlines;
use crate::state::AppState;

pub async fn serve_dashboard(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Response {
    tracing::info!("Accessing dashboard for user {}", user.id);

    let tasks: Vec<Task> = state.tasks.read().tasks_for(&user).into_iter().cloned().collect();
    let summary: TaskSummary = tasks.iter().collect();
    let pick = |filter: TaskFilter| tasks.iter().filter(|t| filter.matches(t)).collect::<Vec<_>>();

    Json(json!({
        "user": UserProfile::from(&user),
        "isAdmin": user.is_admin(),
        "summary": summary,
        "pending": pick(TaskFilter::Pending),
        "active": pick(TaskFilter::Approved),
        "completed": pick(TaskFilter::Completed),
    })).into_response()
}

pub async fn serve_calendar(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Response {
    let deadlines: Vec<Task> = {
        let tasks = state.tasks.read();
        upcoming_deadlines(tasks.tasks_for(&user)).into_iter().cloned().collect()
    };

    Json(json!({ "tasks": deadlines })).into_response()
}
