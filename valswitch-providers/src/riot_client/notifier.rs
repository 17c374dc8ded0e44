//! User-facing login failure notifications.

use tracing::warn;

use super::error::LoginError;

/// Shows a one-shot message when a login attempt fails.
pub trait LoginNotifier: Send + Sync {
    /// Reports `error` to the user.
    fn notify(&self, error: &LoginError);
}

/// Notifier that only writes a log line.
#[derive(Debug, Clone, Default)]
pub struct LogNotifier;

impl LoginNotifier for LogNotifier {
    fn notify(&self, error: &LoginError) {
        warn!(title = error.title(), message = %error, "Login notification");
    }
}
