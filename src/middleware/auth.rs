use axum::{
    middleware::Next,
    response::{IntoResponse, Response},
    extract::{Request, State},
    body::Body,
};
use tower_sessions::Session;
use crate::errors::AppError;
use crate::models::User;
use crate::services::{SessionSlot, SessionStore};
use crate::state::AppState;

/// The authenticated user of the request, put in place by [`require_auth`].
#[derive(Clone, Debug)]
pub struct CurrentUser(pub User);

pub async fn require_auth(
    State(state): State<AppState>,
    session: Session,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let path = req.uri().path();

    if path == "/health" || path == "/login" || path == "/signup" {
        return next.run(req).await;
    }

    let key = state.config.session.storage_key.as_str();
    let slot = SessionSlot::load(&session, key).await;
    let store = SessionStore::restore(state.users.clone(), slot, key);
    if !store.is_authenticated() {
        tracing::debug!("Rejecting anonymous request to {}", req.uri().path());
    }
    let user = store.current_user().cloned();

    // Writes back the removal of a malformed session, if there was one.
    if let Err(e) = store.into_persistence().commit().await {
        return AppError::Session(e).into_response();
    }

    match user {
        Some(user) => {
            req.extensions_mut().insert(CurrentUser(user));
            next.run(req).await
        }
        None => AppError::Auth("Not authenticated".into()).into_response(),
    }
}
