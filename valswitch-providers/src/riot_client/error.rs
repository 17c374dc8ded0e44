//! Terminal login automation failures.

use std::path::PathBuf;

use thiserror::Error;

/// A failure that ends a login attempt and is shown to the user.
#[derive(Debug, Error)]
pub enum LoginError {
    /// No running client and no install found.
    #[error("Riot Client not found in common installation locations:\n{}", list_paths(.probed))]
    ClientNotFound {
        /// Paths that were checked, in order.
        probed: Vec<PathBuf>,
    },

    /// Starting the client failed.
    #[error("Error launching Riot Client: {0}")]
    LaunchFailed(String),

    /// The client exited before the form could be driven.
    #[error("Riot Client process is not available. Please try again.")]
    ProcessUnavailable,

    /// The client has no main window.
    #[error("Could not find Riot Client main window.")]
    NoWindow,

    /// The username field is missing.
    #[error("Could not find username field. Make sure Riot Client login screen is visible.")]
    NoUsernameField,

    /// The password field is missing.
    #[error("Could not find password field. Make sure Riot Client login screen is visible.")]
    NoPasswordField,

    /// Writing a field failed.
    #[error("Error filling {field}: {reason}")]
    FillFailed {
        /// Field that could not be filled.
        field: &'static str,
        /// Platform reason.
        reason: String,
    },

    /// Pressing Enter failed.
    #[error("Error submitting login form: {0}")]
    SubmitFailed(String),

    /// The stored credential cannot be used.
    #[error("Cannot log in to {account}: {reason}")]
    CredentialUnusable {
        /// `name#tag` of the account.
        account: String,
        /// What is missing.
        reason: &'static str,
    },

    /// No desktop automation on this platform.
    #[error("Auto-login is not supported here: {0}")]
    Unsupported(String),

    /// The automation thread died.
    #[error("Login automation crashed: {0}")]
    Internal(String),
}

impl LoginError {
    /// Short title for the user-facing notification.
    pub fn title(&self) -> &'static str {
        match self {
            Self::ClientNotFound { .. } => "Client Not Found",
            Self::LaunchFailed(_) => "Launch Error",
            _ => "Login Error",
        }
    }
}

fn list_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| format!("• {}", p.display()))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_lists_paths() {
        let err = LoginError::ClientNotFound {
            probed: vec![PathBuf::from("C:/a.exe"), PathBuf::from("C:/b.exe")],
        };
        let text = err.to_string();
        assert!(text.contains("• C:/a.exe"));
        assert!(text.contains("• C:/b.exe"));
        assert_eq!(err.title(), "Client Not Found");
    }

    #[test]
    fn test_titles() {
        assert_eq!(LoginError::LaunchFailed("x".into()).title(), "Launch Error");
        assert_eq!(LoginError::NoWindow.title(), "Login Error");
    }
}
