use crate::models::{Notification, Severity};

/// Receiver of the user-facing notices store operations raise.
pub trait Notifier {
    fn notify(&mut self, title: &str, message: &str, severity: Severity);
}

/// Notices collected while serving one request.
#[derive(Debug, Default)]
pub struct Toasts(Vec<Notification>);

impl Toasts {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn as_slice(&self) -> &[Notification] {
        &self.0
    }

    pub fn into_inner(self) -> Vec<Notification> {
        self.0
    }
}

impl Notifier for Toasts {
    fn notify(&mut self, title: &str, message: &str, severity: Severity) {
        tracing::debug!(?severity, "{}: {}", title, message);
        self.0.push(Notification {
            title: title.to_string(),
            message: message.to_string(),
            severity,
        });
    }
}
