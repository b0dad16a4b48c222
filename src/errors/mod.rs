// Error type for the web layer. The stores themselves fail quietly and never
// produce these; handlers raise them for missing sessions, policy violations
// and malformed input.
use thiserror::Error;

pub mod response;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    // Failures of the cookie session store (tower-sessions) while writing.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),
}

pub type AppResult<T> = Result<T, AppError>;
