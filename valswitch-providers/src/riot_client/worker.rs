//! Background login worker.
//!
//! Login automation blocks for a few seconds and must not run twice at
//! once against the same client window. The worker owns a queue and runs
//! jobs one at a time on its own task, so callers just submit and move on.

use std::fmt;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use valswitch_core::Account;

use super::driver::LoginAutomationDriver;

/// Queue depth before `submit` starts waiting.
const QUEUE_DEPTH: usize = 8;

/// One login request.
pub enum LoginJob {
    /// Plain credentials, already decrypted.
    Credentials {
        /// Riot login name.
        username: String,
        /// Password.
        secret: String,
    },
    /// A stored account whose password is decrypted on the worker.
    Account(Box<Account>),
}

impl fmt::Debug for LoginJob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Credentials { username, .. } => f
                .debug_struct("Credentials")
                .field("username", username)
                .field("secret", &"[REDACTED]")
                .finish(),
            Self::Account(account) => f
                .debug_tuple("Account")
                .field(&account.full_username())
                .finish(),
        }
    }
}

/// Runs login jobs sequentially on a background task.
pub struct LoginWorker {
    tx: mpsc::Sender<LoginJob>,
    handle: JoinHandle<()>,
}

impl LoginWorker {
    /// Starts the worker. Must be called inside a Tokio runtime.
    pub fn spawn(driver: Arc<LoginAutomationDriver>) -> Self {
        let (tx, mut rx) = mpsc::channel::<LoginJob>(QUEUE_DEPTH);

        let handle = tokio::spawn(async move {
            while let Some(job) = rx.recv().await {
                debug!(?job, "Running login job");
                match job {
                    LoginJob::Credentials { username, secret } => {
                        driver.launch_and_login(&username, &secret).await;
                    }
                    LoginJob::Account(account) => driver.login_account(&account).await,
                }
            }
            debug!("Login worker stopped");
        });

        Self { tx, handle }
    }

    /// Queues a job. Returns false if the worker has stopped.
    pub async fn submit(&self, job: LoginJob) -> bool {
        if self.tx.send(job).await.is_err() {
            warn!("Login worker is gone, job dropped");
            return false;
        }
        true
    }

    /// Closes the queue and waits for queued jobs to finish.
    pub async fn shutdown(self) {
        drop(self.tx);
        if let Err(e) = self.handle.await {
            warn!(error = %e, "Login worker panicked");
        }
    }
}
