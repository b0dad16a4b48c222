mod models;
mod handlers;
mod services;
mod middleware;
mod config;
mod errors;
mod state;

use anyhow::Context;
use axum::{
    routing::{get, post},
    Router,
    middleware::from_fn_with_state,
};
use tower::ServiceBuilder;
use tower_http::{
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};
use tower_sessions::{MemoryStore, SessionManagerLayer};
use tower_sessions::cookie::SameSite;
use tracing_subscriber::EnvFilter;
use crate::{
    config::Config,
    services::Dataset,
    state::AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::load().context("Failed to load configuration")?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log.filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let data = if config.seed.enabled {
        Dataset::sample()
    } else {
        Dataset::empty()
    };

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState::new(data, config);
    tracing::info!(
        "Loaded {} users, {} tasks, {} messages",
        state.users.all().len(),
        state.tasks.read().tasks().len(),
        state.messages.read().messages().len()
    );
    let app = app(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Server running on {}", addr);

    axum::serve(listener, app.into_make_service())
        .await
        .context("Server stopped unexpectedly")?;
    Ok(())
}

pub fn app(state: AppState) -> Router {
    // Session store setup
    let session_layer = SessionManagerLayer::new(MemoryStore::default())
        .with_secure(state.config.session.secure)
        .with_same_site(SameSite::Lax)
        .with_name(state.config.session.cookie_name.clone());

    Router::new()
        // Session routes
        .route("/health", get(handlers::health))
        .route("/login", post(handlers::handle_login))
        .route("/signup", post(handlers::handle_signup))
        .route("/logout", post(handlers::handle_logout))
        .route("/me", get(handlers::current_profile))

        // Task routes
        .route("/dashboard", get(handlers::serve_dashboard))
        .route("/calendar", get(handlers::serve_calendar))
        .route("/tasks", get(handlers::list_tasks).post(handlers::create_task))
        .route(
            "/tasks/:task_id",
            get(handlers::view_task)
                .patch(handlers::update_task)
                .delete(handlers::delete_task),
        )
        .route("/tasks/:task_id/approve", post(handlers::approve_task))
        .route("/tasks/:task_id/decline", post(handlers::decline_task))
        .route("/tasks/:task_id/complete", post(handlers::complete_task))
        .route("/tasks/:task_id/messages", post(handlers::message_about_task))

        // Messaging routes
        .route("/conversations", get(handlers::list_conversations))
        .route("/conversations/:conversation_id/messages", get(handlers::conversation_messages))
        .route("/conversations/:conversation_id/read", post(handlers::mark_conversation_read))
        .route("/messages", post(handlers::send_message))

        // User routes
        .route("/users", get(handlers::list_members))
        .route("/users/:user_id", get(handlers::view_user))

        // Add middleware
        .layer(from_fn_with_state(state.clone(), middleware::require_auth))
        .layer(session_layer)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(RequestBodyLimitLayer::new(state.config.limits.max_body_size)),
        )

        // Add state
        .with_state(state)
}
