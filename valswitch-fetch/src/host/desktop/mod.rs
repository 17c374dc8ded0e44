//! Desktop automation seam.
//!
//! The login driver talks to windows and form controls only through
//! [`DesktopAutomation`] and [`AutomationSession`]. Each target OS gets one
//! implementation:
//!
//! - Windows: UI Automation plus Win32 focus APIs ([`UiAutomation`])
//! - everything else: [`UnsupportedAutomation`], which fails at attach time
//!
//! All methods are blocking. Callers run them on a blocking thread, and a
//! session never leaves the thread that created it.

#[cfg(windows)]
mod win32;

#[cfg(not(windows))]
mod unsupported;

use std::sync::Arc;

use crate::error::AutomationError;

#[cfg(windows)]
pub use self::win32::UiAutomation;

#[cfg(not(windows))]
pub use self::unsupported::UnsupportedAutomation;

/// Handle to a control found inside an [`AutomationSession`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ControlId(pub usize);

/// Entry point for window-level automation.
pub trait DesktopAutomation: Send + Sync {
    /// Brings the main window of `pid` to the foreground.
    ///
    /// Restores a minimized window, shows it and raises it. If the window is
    /// still not in the foreground, input queues are attached to force it.
    fn focus_window(&self, pid: u32) -> Result<(), AutomationError>;

    /// Attaches to the main window of `pid`.
    ///
    /// Fails with [`AutomationError::NoWindow`] when the process has none.
    fn attach(&self, pid: u32) -> Result<Box<dyn AutomationSession>, AutomationError>;
}

/// Control-level automation on one attached window.
pub trait AutomationSession {
    /// Narrows later lookups to the first descendant pane called `name`.
    ///
    /// Returns false (and keeps searching the whole window) when there is no
    /// such pane.
    fn narrow_to_pane(&mut self, name: &str) -> bool;

    /// Finds the first edit control with the given automation id.
    fn find_edit(&mut self, automation_id: &str) -> Result<ControlId, AutomationError>;

    /// Gives keyboard focus to a control.
    fn focus(&mut self, control: ControlId) -> Result<(), AutomationError>;

    /// Replaces a control's value directly, without simulated typing.
    fn set_value(&mut self, control: ControlId, value: &str) -> Result<(), AutomationError>;

    /// Sends one Enter key press to the focused control.
    fn press_enter(&mut self) -> Result<(), AutomationError>;
}

/// Returns the automation backend for the current platform.
pub fn platform_automation() -> Arc<dyn DesktopAutomation> {
    #[cfg(windows)]
    {
        Arc::new(UiAutomation::new())
    }
    #[cfg(not(windows))]
    {
        Arc::new(UnsupportedAutomation::new())
    }
}
