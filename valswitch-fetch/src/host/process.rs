//! Process discovery, launch and termination.
//!
//! Process tables come from `sysinfo`; launches go through
//! `tokio::process`. Names are matched case-insensitively with any `.exe`
//! suffix stripped, so `"Riot Client"` finds `Riot Client.exe` on Windows.

use std::ffi::OsStr;
use std::path::Path;
use std::process::Stdio;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use sysinfo::{Pid, ProcessesToUpdate, System};
use tokio::process::Command;
use tracing::{debug, info, instrument, warn};

use crate::error::ProcessError;

/// How often termination progress is polled.
const POLL_INTERVAL: Duration = Duration::from_millis(250);

// ============================================================================
// Process Host Trait
// ============================================================================

/// OS process primitives needed to drive the game client.
#[async_trait]
pub trait ClientProcessHost: Send + Sync {
    /// Returns the pids of running processes called `name`.
    async fn find_by_name(&self, name: &str) -> Vec<u32>;

    /// Returns true if `pid` is still running.
    async fn is_alive(&self, pid: u32) -> bool;

    /// Returns true if `path` points at an existing file.
    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    /// Starts `path` with no arguments and returns its pid.
    async fn launch(&self, path: &Path) -> Result<u32, ProcessError>;

    /// Asks every process called `name` to close, waits up to `grace`, then
    /// kills whatever is left. Returns how many processes were found.
    async fn terminate(&self, name: &str, grace: Duration) -> Result<usize, ProcessError>;
}

/// Returns true if a process name matches `target`.
pub fn process_name_matches(process_name: &OsStr, target: &str) -> bool {
    let name = process_name.to_string_lossy();
    let stem = match name.len().checked_sub(4) {
        Some(cut) if name.is_char_boundary(cut) && name[cut..].eq_ignore_ascii_case(".exe") => {
            &name[..cut]
        }
        _ => &name[..],
    };
    stem.eq_ignore_ascii_case(target.trim())
}

// ============================================================================
// System Implementation
// ============================================================================

/// [`ClientProcessHost`] backed by the real process table.
#[derive(Debug, Clone, Default)]
pub struct SystemProcessHost;

impl SystemProcessHost {
    /// Creates a new process host.
    pub fn new() -> Self {
        Self
    }

    fn snapshot() -> System {
        let mut system = System::new();
        system.refresh_processes(ProcessesToUpdate::All, true);
        system
    }

    fn pids_named(system: &System, name: &str) -> Vec<u32> {
        system
            .processes()
            .iter()
            .filter(|(_, process)| process_name_matches(process.name(), name))
            .map(|(pid, _)| pid.as_u32())
            .collect()
    }

    /// Sends the platform's polite close request.
    #[cfg(windows)]
    async fn request_close(&self, name: &str, _pids: &[u32]) {
        // taskkill without /F posts WM_CLOSE to the main window.
        let image = format!("{name}.exe");
        match Command::new("taskkill")
            .args(["/IM", &image])
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
        {
            Ok(status) => debug!(image = %image, ?status, "Requested graceful close"),
            Err(e) => warn!(image = %image, error = %e, "taskkill failed"),
        }
    }

    /// Sends the platform's polite close request.
    #[cfg(not(windows))]
    async fn request_close(&self, _name: &str, pids: &[u32]) {
        let system = Self::snapshot();
        for pid in pids {
            if let Some(process) = system.process(Pid::from_u32(*pid)) {
                let sent = process.kill_with(sysinfo::Signal::Term);
                debug!(pid, ?sent, "Sent SIGTERM");
            }
        }
    }
}

#[async_trait]
impl ClientProcessHost for SystemProcessHost {
    async fn find_by_name(&self, name: &str) -> Vec<u32> {
        let pids = Self::pids_named(&Self::snapshot(), name);
        debug!(name = %name, count = pids.len(), "Process lookup");
        pids
    }

    async fn is_alive(&self, pid: u32) -> bool {
        let mut system = System::new();
        let pid = Pid::from_u32(pid);
        system.refresh_processes(ProcessesToUpdate::Some(&[pid]), true);
        system.process(pid).is_some()
    }

    #[instrument(skip(self), fields(path = %path.display()))]
    async fn launch(&self, path: &Path) -> Result<u32, ProcessError> {
        if !path.is_file() {
            return Err(ProcessError::NotFound(path.display().to_string()));
        }

        let child = Command::new(path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| ProcessError::LaunchFailed(e.to_string()))?;

        let pid = child
            .id()
            .ok_or_else(|| ProcessError::LaunchFailed("process exited immediately".to_string()))?;

        info!(pid, "Process launched");
        Ok(pid)
    }

    #[instrument(skip(self))]
    async fn terminate(&self, name: &str, grace: Duration) -> Result<usize, ProcessError> {
        let pids = self.find_by_name(name).await;
        if pids.is_empty() {
            debug!("Nothing to terminate");
            return Ok(0);
        }

        self.request_close(name, &pids).await;

        let deadline = Instant::now() + grace;
        let mut remaining = pids.clone();
        while !remaining.is_empty() && Instant::now() < deadline {
            tokio::time::sleep(POLL_INTERVAL).await;
            let system = Self::snapshot();
            remaining.retain(|pid| system.process(Pid::from_u32(*pid)).is_some());
        }

        if remaining.is_empty() {
            info!(count = pids.len(), "Processes closed gracefully");
            return Ok(pids.len());
        }

        warn!(count = remaining.len(), "Grace period elapsed, killing");
        let system = Self::snapshot();
        for pid in &remaining {
            if let Some(process) = system.process(Pid::from_u32(*pid)) {
                process.kill();
            }
        }

        tokio::time::sleep(POLL_INTERVAL).await;
        let system = Self::snapshot();
        remaining.retain(|pid| system.process(Pid::from_u32(*pid)).is_some());
        if remaining.is_empty() {
            Ok(pids.len())
        } else {
            Err(ProcessError::Survived {
                count: remaining.len(),
                waited: grace,
            })
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_matching() {
        assert!(process_name_matches(OsStr::new("Riot Client.exe"), "Riot Client"));
        assert!(process_name_matches(OsStr::new("RiotClientServices.EXE"), "riotclientservices"));
        assert!(process_name_matches(OsStr::new("RiotClientServices"), "RiotClientServices"));
        assert!(!process_name_matches(OsStr::new("Riot Client Helper.exe"), "Riot Client"));
        assert!(!process_name_matches(OsStr::new(".exe"), "Riot Client"));
    }

    #[tokio::test]
    async fn test_find_unknown_process_is_empty() {
        let host = SystemProcessHost::new();
        assert!(host.find_by_name("valswitch-no-such-process").await.is_empty());
    }

    #[tokio::test]
    async fn test_current_process_is_alive() {
        let host = SystemProcessHost::new();
        assert!(host.is_alive(std::process::id()).await);
    }

    #[tokio::test]
    async fn test_launch_missing_file() {
        let host = SystemProcessHost::new();
        let dir = tempfile::tempdir().unwrap();
        let result = host.launch(&dir.path().join("missing.exe")).await;
        assert!(matches!(result, Err(ProcessError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_terminate_nothing_running() {
        let host = SystemProcessHost::new();
        let count = host
            .terminate("valswitch-no-such-process", Duration::from_millis(10))
            .await
            .unwrap();
        assert_eq!(count, 0);
    }
}
