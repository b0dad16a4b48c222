use axum::{
    extract::{Extension, Json, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tower_sessions::Session;
use crate::errors::AppResult;
use crate::middleware::CurrentUser;
use crate::models::{LoginForm, SignupForm, UserProfile};
use crate::services::{SessionSlot, SessionStore, Toasts};
use crate::state::AppState;

// Opens the session store of this request's cookie session.
pub(crate) async fn open_session(state: &AppState, session: &Session) -> SessionStore<SessionSlot> {
    let key = state.config.session.storage_key.as_str();
    let slot = SessionSlot::load(session, key).await;
    SessionStore::restore(state.users.clone(), slot, key)
}

#[axum::debug_handler]
pub async fn handle_login(
    State(state): State<AppState>,
    session: Session,
    Json(login_form): Json<LoginForm>,
) -> AppResult<Response> {
    tracing::info!("Login attempt for {}", login_form.email);

    let mut toasts = Toasts::new();
    let mut store = open_session(&state, &session).await;
    let ok = store.login(&login_form.email, &login_form.password, &mut toasts);
    let user = store.current_user().map(UserProfile::from);
    let is_admin = store.is_admin();
    store.into_persistence().commit().await?;

    let status = if ok { StatusCode::OK } else { StatusCode::UNAUTHORIZED };
    Ok((status, Json(json!({
        "ok": ok,
        "user": user,
        "isAdmin": is_admin,
        "notifications": toasts.into_inner(),
    }))).into_response())
}

pub async fn handle_signup(
    State(state): State<AppState>,
    session: Session,
    Json(signup_form): Json<SignupForm>,
) -> AppResult<Response> {
    tracing::info!("Signup attempt for {}", signup_form.email);

    let mut toasts = Toasts::new();
    let mut store = open_session(&state, &session).await;
    let ok = store.signup(
        &signup_form.name,
        &signup_form.email,
        &signup_form.password,
        signup_form.role,
        &mut toasts,
    );
    let user = store.current_user().map(UserProfile::from);
    let is_admin = store.is_admin();
    store.into_persistence().commit().await?;

    let status = if ok { StatusCode::CREATED } else { StatusCode::CONFLICT };
    Ok((status, Json(json!({
        "ok": ok,
        "user": user,
        "isAdmin": is_admin,
        "notifications": toasts.into_inner(),
    }))).into_response())
}

#[axum::debug_handler]
pub async fn handle_logout(
    State(state): State<AppState>,
    session: Session,
) -> AppResult<Response> {
    let mut toasts = Toasts::new();
    let mut store = open_session(&state, &session).await;
    store.logout(&mut toasts);
    store.into_persistence().commit().await?;

    Ok(Json(json!({ "notifications": toasts.into_inner() })).into_response())
}

pub async fn current_profile(Extension(CurrentUser(user)): Extension<CurrentUser>) -> Response {
    Json(json!({
        "user": UserProfile::from(&user),
        "isAdmin": user.is_admin(),
    })).into_response()
}

pub async fn health() -> &'static str {
    "ok"
}
