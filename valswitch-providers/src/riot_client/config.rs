//! Riot Client locations, names and login timings.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Process that owns the login window.
pub const WINDOW_PROCESS: &str = "Riot Client";

/// Background service process, launched from the install path and used for
/// running checks and shutdown.
pub const SERVICE_PROCESS: &str = "RiotClientServices";

/// Pane that hosts the login form inside the main window.
pub const WINDOW_PANE_NAME: &str = "Riot Client";

/// Automation id of the username edit.
pub const USERNAME_FIELD_ID: &str = "username";

/// Automation id of the password edit.
pub const PASSWORD_FIELD_ID: &str = "password";

const CLIENT_RELATIVE_PATH: &str = r"Riot Games\Riot Client\RiotClientServices.exe";

/// Well-known install locations, in probe order.
///
/// Fixed drive paths come first, then the same layout under the
/// `LOCALAPPDATA`, `ProgramFiles` and `ProgramFiles(x86)` folders.
pub fn default_install_paths() -> Vec<PathBuf> {
    let mut paths: Vec<PathBuf> = [
        r"C:\Riot Games\Riot Client\RiotClientServices.exe",
        r"C:\Program Files\Riot Games\Riot Client\RiotClientServices.exe",
        r"C:\Program Files (x86)\Riot Games\Riot Client\RiotClientServices.exe",
    ]
    .into_iter()
    .map(PathBuf::from)
    .collect();

    for var in ["LOCALAPPDATA", "ProgramFiles", "ProgramFiles(x86)"] {
        if let Some(root) = env::var_os(var).filter(|v| !v.is_empty()) {
            let candidate = PathBuf::from(root).join(CLIENT_RELATIVE_PATH);
            if !paths.contains(&candidate) {
                paths.push(candidate);
            }
        }
    }

    paths
}

/// Where to find the client and what to look for once it runs.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Install paths to probe, first existing wins.
    pub install_paths: Vec<PathBuf>,
    /// Process name that owns the login window.
    pub window_process: String,
    /// Service process name for running checks and shutdown.
    pub service_process: String,
    /// How long a graceful shutdown may take before a forced kill.
    pub kill_grace: Duration,
}

impl ClientConfig {
    /// Appends user-configured install paths after the defaults.
    pub fn with_extra_paths(mut self, extra: impl IntoIterator<Item = PathBuf>) -> Self {
        for path in extra {
            if !self.install_paths.contains(&path) {
                self.install_paths.push(path);
            }
        }
        self
    }

    /// Replaces the install paths.
    pub fn with_install_paths(mut self, paths: Vec<PathBuf>) -> Self {
        self.install_paths = paths;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            install_paths: default_install_paths(),
            window_process: WINDOW_PROCESS.to_string(),
            service_process: SERVICE_PROCESS.to_string(),
            kill_grace: Duration::from_secs(5),
        }
    }
}

/// Fixed waits between login steps.
#[derive(Debug, Clone, Copy)]
pub struct LoginTiming {
    /// Wait for the login form to render after discovery or launch.
    pub settle: Duration,
    /// Extra wait once the process is confirmed alive.
    pub confirm: Duration,
    /// Wait after the focus handshake.
    pub after_focus: Duration,
    /// Wait before refocusing the password field.
    pub before_submit: Duration,
    /// Wait between refocusing and pressing Enter.
    pub before_enter: Duration,
    /// Wait after pressing Enter.
    pub after_submit: Duration,
}

impl LoginTiming {
    /// No waits. Used in tests.
    pub fn immediate() -> Self {
        Self {
            settle: Duration::ZERO,
            confirm: Duration::ZERO,
            after_focus: Duration::ZERO,
            before_submit: Duration::ZERO,
            before_enter: Duration::ZERO,
            after_submit: Duration::ZERO,
        }
    }
}

impl Default for LoginTiming {
    fn default() -> Self {
        Self {
            settle: Duration::from_millis(800),
            confirm: Duration::from_millis(200),
            after_focus: Duration::from_millis(500),
            before_submit: Duration::from_millis(100),
            before_enter: Duration::from_millis(50),
            after_submit: Duration::from_millis(500),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_paths_come_first() {
        let paths = default_install_paths();
        assert_eq!(
            paths[0],
            PathBuf::from(r"C:\Riot Games\Riot Client\RiotClientServices.exe")
        );
        assert!(paths.len() >= 3);
    }

    #[test]
    fn test_extra_paths_appended_once() {
        let config = ClientConfig::default()
            .with_install_paths(vec![PathBuf::from("a")])
            .with_extra_paths(vec![PathBuf::from("b"), PathBuf::from("a")]);
        assert_eq!(config.install_paths, vec![PathBuf::from("a"), PathBuf::from("b")]);
    }
}
