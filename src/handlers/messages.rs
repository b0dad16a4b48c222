use axum::{
    extract::{Extension, Json, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use crate::errors::{AppError, AppResult};
use crate::middleware::CurrentUser;
use crate::models::{Message, SendMessageForm, UserProfile};
use crate::services::Toasts;
use crate::state::AppState;

/// The viewer's conversations with the other participant, the last message
/// and how many messages are waiting to be read.
pub async fn list_conversations(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Response {
    let messages = state.messages.read();
    let conversations: Vec<_> = messages
        .conversations_for_user(&user.id)
        .into_iter()
        .map(|conversation| {
            let other = conversation
                .other_participant(&user.id)
                .and_then(|id| messages.user_by_id(id))
                .map(|u| UserProfile::from(&u));
            json!({
                "id": conversation.id,
                "participants": conversation.participants,
                "other": other,
                "lastMessage": conversation.last_message,
                "updatedAt": conversation.updated_at,
                "unread": messages.unread_count(&conversation.id, &user.id),
            })
        })
        .collect();
    drop(messages);

    Json(json!({ "conversations": conversations })).into_response()
}

pub async fn conversation_messages(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(conversation_id): Path<String>,
) -> AppResult<Response> {
    let thread: Vec<Message> = {
        let messages = state.messages.read();
        let visible = messages
            .conversation(&conversation_id)
            .is_some_and(|c| c.includes(&user.id));
        if !visible {
            return Err(AppError::NotFound(format!("Conversation {} not found", conversation_id)));
        }
        messages
            .messages_for_conversation(&conversation_id)
            .into_iter()
            .cloned()
            .collect()
    };

    Ok(Json(json!({ "messages": thread })).into_response())
}

pub async fn mark_conversation_read(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(conversation_id): Path<String>,
) -> Response {
    let marked = state
        .messages
        .write()
        .mark_messages_as_read(&conversation_id, &user.id);

    Json(json!({ "marked": marked })).into_response()
}

pub async fn send_message(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(form): Json<SendMessageForm>,
) -> AppResult<Response> {
    if form.content.trim().is_empty() {
        return Err(AppError::Validation("message is empty".into()));
    }
    if form.receiver_id == user.id {
        return Err(AppError::Validation("cannot message yourself".into()));
    }
    if state.users.get(&form.receiver_id).is_none() {
        return Err(AppError::NotFound(format!("User {} not found", form.receiver_id)));
    }

    let mut toasts = Toasts::new();
    let message = state
        .messages
        .write()
        .send_message(&user.id, &form.receiver_id, &form.content, &mut toasts);

    Ok((StatusCode::CREATED, Json(json!({
        "message": message,
        "notifications": toasts.into_inner(),
    }))).into_response())
}
