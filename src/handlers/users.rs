use axum::{
    extract::{Extension, Json, Path, Query, State},
    response::{IntoResponse, Response},
};
use serde_json::json;
use crate::errors::{AppError, AppResult};
use crate::middleware::CurrentUser;
use crate::models::{MemberQuery, UserProfile};
use crate::services::policy::{self, Action};
use crate::state::AppState;

pub async fn list_members(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Query(query): Query<MemberQuery>,
) -> AppResult<Response> {
    policy::authorize(&user, Action::ListMembers)?;

    let members: Vec<UserProfile> = state
        .users
        .members(query.search.as_deref())
        .iter()
        .map(UserProfile::from)
        .collect();

    Ok(Json(json!({ "users": members })).into_response())
}

pub async fn view_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<Response> {
    let user = state
        .messages
        .read()
        .user_by_id(&user_id)
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", user_id)))?;

    Ok(Json(json!({ "user": UserProfile::from(&user) })).into_response())
}
