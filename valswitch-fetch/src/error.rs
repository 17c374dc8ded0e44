//! Fetch and host error types.

use std::time::Duration;
use thiserror::Error;

// ============================================================================
// Main Fetch Error
// ============================================================================

/// Error type for HTTP fetch operations.
#[derive(Debug, Error)]
pub enum FetchError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Request timed out.
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    /// Rate limited by the provider.
    #[error("Rate limited: {message}")]
    RateLimited {
        /// Provider-supplied message.
        message: String,
    },

    /// Authentication failed.
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Invalid response from the provider.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// JSON parsing error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

// ============================================================================
// Keychain Error
// ============================================================================

/// Error type for keychain operations.
#[derive(Debug, Error)]
pub enum KeychainError {
    /// Credential not found.
    #[error("Credential not found for {service}/{account}")]
    NotFound {
        /// Service name.
        service: String,
        /// Account name.
        account: String,
    },

    /// Access denied.
    #[error("Access denied to keychain")]
    AccessDenied,

    /// Platform error.
    #[error("Platform error: {0}")]
    Platform(String),

    /// Generic error.
    #[error("Keychain error: {0}")]
    Other(String),
}

impl From<keyring::Error> for KeychainError {
    fn from(err: keyring::Error) -> Self {
        match err {
            keyring::Error::NoEntry => KeychainError::NotFound {
                service: String::new(),
                account: String::new(),
            },
            keyring::Error::Ambiguous(_) => {
                KeychainError::Other("Ambiguous credential entry".to_string())
            }
            keyring::Error::PlatformFailure(e) => KeychainError::Platform(e.to_string()),
            keyring::Error::NoStorageAccess(_) => KeychainError::AccessDenied,
            _ => KeychainError::Other(err.to_string()),
        }
    }
}

// ============================================================================
// Process Error
// ============================================================================

/// Error type for client process operations.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// Executable not found.
    #[error("Executable not found: {0}")]
    NotFound(String),

    /// Launch failed.
    #[error("Launch failed: {0}")]
    LaunchFailed(String),

    /// Processes still alive after the grace period and a forced kill.
    #[error("{count} process(es) survived termination after {waited:?}")]
    Survived {
        /// How many processes are still running.
        count: usize,
        /// Grace period that was waited.
        waited: Duration,
    },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

// ============================================================================
// Automation Error
// ============================================================================

/// Error type for desktop automation.
#[derive(Debug, Error)]
pub enum AutomationError {
    /// The process has no usable top-level window.
    #[error("No main window for process {pid}")]
    NoWindow {
        /// Target process id.
        pid: u32,
    },

    /// A control with the given automation id was not found.
    #[error("Control not found: {0}")]
    ControlNotFound(String),

    /// Setting a control's value failed.
    #[error("Could not set value of {control}: {reason}")]
    SetValue {
        /// Automation id of the control.
        control: String,
        /// Platform reason.
        reason: String,
    },

    /// Keyboard input could not be dispatched.
    #[error("Input failed: {0}")]
    Input(String),

    /// Focus handshake failed.
    #[error("Focus failed: {0}")]
    Focus(String),

    /// No automation backend exists for this platform.
    #[error("Desktop automation is not supported on {0}")]
    Unsupported(&'static str),

    /// Other platform failure.
    #[error("Platform error: {0}")]
    Platform(String),
}
