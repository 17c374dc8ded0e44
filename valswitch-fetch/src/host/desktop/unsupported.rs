//! Fallback backend for platforms without a Riot Client UI to drive.

use tracing::debug;

use super::{AutomationSession, DesktopAutomation};
use crate::error::AutomationError;

/// Backend that refuses every operation.
#[derive(Debug, Clone, Default)]
pub struct UnsupportedAutomation;

impl UnsupportedAutomation {
    /// Creates the backend.
    pub fn new() -> Self {
        Self
    }
}

impl DesktopAutomation for UnsupportedAutomation {
    fn focus_window(&self, pid: u32) -> Result<(), AutomationError> {
        debug!(pid, "Focus skipped on unsupported platform");
        Err(AutomationError::Unsupported(std::env::consts::OS))
    }

    fn attach(&self, _pid: u32) -> Result<Box<dyn AutomationSession>, AutomationError> {
        Err(AutomationError::Unsupported(std::env::consts::OS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_call_is_unsupported() {
        let backend = UnsupportedAutomation::new();
        assert!(matches!(
            backend.focus_window(1),
            Err(AutomationError::Unsupported(_))
        ));
        assert!(matches!(backend.attach(1), Err(AutomationError::Unsupported(_))));
    }
}
