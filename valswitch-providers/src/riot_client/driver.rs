//! The login automation state machine.

use std::sync::Arc;
use std::thread;

use tracing::{debug, error, info, instrument};
use valswitch_core::Account;
use valswitch_fetch::{
    AutomationError, AutomationSession, ClientProcessHost, ControlId, CredentialVault,
    DesktopAutomation, ProcessError,
};

use super::config::{
    ClientConfig, LoginTiming, PASSWORD_FIELD_ID, USERNAME_FIELD_ID, WINDOW_PANE_NAME,
};
use super::error::LoginError;
use super::notifier::LoginNotifier;

/// Drives the Riot Client login form.
///
/// Steps: discover or launch the client, let it settle, focus its window
/// (best effort), locate the two form fields, set their values, press Enter.
/// Terminal failures are logged and passed to the [`LoginNotifier`]; focus
/// problems are not.
pub struct LoginAutomationDriver {
    vault: Arc<CredentialVault>,
    processes: Arc<dyn ClientProcessHost>,
    desktop: Arc<dyn DesktopAutomation>,
    notifier: Arc<dyn LoginNotifier>,
    config: ClientConfig,
    timing: LoginTiming,
}

impl LoginAutomationDriver {
    /// Creates a driver with default install paths and timings.
    pub fn new(
        vault: Arc<CredentialVault>,
        processes: Arc<dyn ClientProcessHost>,
        desktop: Arc<dyn DesktopAutomation>,
        notifier: Arc<dyn LoginNotifier>,
    ) -> Self {
        Self {
            vault,
            processes,
            desktop,
            notifier,
            config: ClientConfig::default(),
            timing: LoginTiming::default(),
        }
    }

    /// Replaces the client configuration.
    pub fn with_config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Replaces the step timings.
    pub fn with_timing(mut self, timing: LoginTiming) -> Self {
        self.timing = timing;
        self
    }

    /// Runs the full login sequence with an already decrypted password.
    ///
    /// Nothing is returned: failures are reported to the user, and a
    /// submitted form is not checked for success.
    #[instrument(skip(self, secret))]
    pub async fn launch_and_login(&self, username: &str, secret: &str) {
        match self.run(username, secret).await {
            Ok(()) => info!("Login form submitted"),
            Err(e) => self.report(&e),
        }
    }

    /// Decrypts the account's password and logs it in.
    ///
    /// A missing login name, missing token or undecryptable token is
    /// reported as an unusable credential before anything is launched.
    pub async fn login_account(&self, account: &Account) {
        info!(account = %account.full_username(), "Starting login");

        if account.account_name.trim().is_empty() || account.encrypted_password.is_empty() {
            self.report(&LoginError::CredentialUnusable {
                account: account.full_username(),
                reason: "login name or password is missing",
            });
            return;
        }

        let secret = self.vault.decrypt(&account.encrypted_password).await;
        if secret.is_empty() {
            self.report(&LoginError::CredentialUnusable {
                account: account.full_username(),
                reason: "stored password could not be decrypted",
            });
            return;
        }

        self.launch_and_login(&account.account_name, &secret).await;
    }

    /// Returns true if the client service process is running.
    pub async fn is_client_running(&self) -> bool {
        !self
            .processes
            .find_by_name(&self.config.service_process)
            .await
            .is_empty()
    }

    /// Closes the client service, killing it after the grace period.
    ///
    /// Returns how many processes were found.
    pub async fn kill_client(&self) -> Result<usize, ProcessError> {
        self.processes
            .terminate(&self.config.service_process, self.config.kill_grace)
            .await
    }

    fn report(&self, err: &LoginError) {
        error!(title = err.title(), error = %err, "Login failed");
        self.notifier.notify(err);
    }

    async fn run(&self, username: &str, secret: &str) -> Result<(), LoginError> {
        let pid = self.discover_or_launch().await?;

        tokio::time::sleep(self.timing.settle).await;
        if !self.processes.is_alive(pid).await {
            return Err(LoginError::ProcessUnavailable);
        }
        tokio::time::sleep(self.timing.confirm).await;

        // A freshly launched service spawns the window process; prefer it.
        let target = self
            .processes
            .find_by_name(&self.config.window_process)
            .await
            .first()
            .copied()
            .unwrap_or(pid);

        let desktop = Arc::clone(&self.desktop);
        let timing = self.timing;
        let username = username.to_string();
        let secret = secret.to_string();

        tokio::task::spawn_blocking(move || {
            fill_and_submit(desktop.as_ref(), target, &username, &secret, timing)
        })
        .await
        .map_err(|e| LoginError::Internal(e.to_string()))?
    }

    async fn discover_or_launch(&self) -> Result<u32, LoginError> {
        if let Some(pid) = self
            .processes
            .find_by_name(&self.config.window_process)
            .await
            .first()
            .copied()
        {
            info!(pid, "Riot Client already running");
            return Ok(pid);
        }

        let path = self
            .config
            .install_paths
            .iter()
            .find(|p| self.processes.exists(p))
            .ok_or_else(|| LoginError::ClientNotFound {
                probed: self.config.install_paths.clone(),
            })?;

        info!(path = %path.display(), "Launching Riot Client");
        self.processes
            .launch(path)
            .await
            .map_err(|e| LoginError::LaunchFailed(e.to_string()))
    }
}

/// Focus, locate, fill and submit. Runs on a blocking thread.
fn fill_and_submit(
    desktop: &dyn DesktopAutomation,
    pid: u32,
    username: &str,
    secret: &str,
    timing: LoginTiming,
) -> Result<(), LoginError> {
    if let Err(e) = desktop.focus_window(pid) {
        debug!(pid, error = %e, "Focus handshake failed, continuing");
    }
    thread::sleep(timing.after_focus);

    let mut session = desktop.attach(pid).map_err(|e| match e {
        AutomationError::Unsupported(os) => LoginError::Unsupported(os.to_string()),
        _ => LoginError::NoWindow,
    })?;

    if !session.narrow_to_pane(WINDOW_PANE_NAME) {
        debug!("Login pane not found, searching the whole window");
    }

    let username_field = session
        .find_edit(USERNAME_FIELD_ID)
        .map_err(|_| LoginError::NoUsernameField)?;
    let password_field = session
        .find_edit(PASSWORD_FIELD_ID)
        .map_err(|_| LoginError::NoPasswordField)?;

    fill(session.as_mut(), username_field, username).map_err(|e| LoginError::FillFailed {
        field: "username",
        reason: e.to_string(),
    })?;
    fill(session.as_mut(), password_field, secret).map_err(|e| LoginError::FillFailed {
        field: "password",
        reason: e.to_string(),
    })?;
    debug!("Credentials filled");

    thread::sleep(timing.before_submit);
    session
        .focus(password_field)
        .map_err(|e| LoginError::SubmitFailed(e.to_string()))?;
    thread::sleep(timing.before_enter);
    session
        .press_enter()
        .map_err(|e| LoginError::SubmitFailed(e.to_string()))?;
    thread::sleep(timing.after_submit);

    Ok(())
}

fn fill(
    session: &mut dyn AutomationSession,
    control: ControlId,
    value: &str,
) -> Result<(), AutomationError> {
    session.focus(control)?;
    session.set_value(control, value)
}
