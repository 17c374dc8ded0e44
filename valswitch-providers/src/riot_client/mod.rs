//! Riot Client login automation.
//!
//! Finds or launches the Riot Client, brings its window forward, fills the
//! login form through desktop automation and presses Enter. Whether the
//! login itself succeeds is not observed.

mod config;
mod driver;
mod error;
mod notifier;
mod worker;

pub use config::{
    ClientConfig, LoginTiming, PASSWORD_FIELD_ID, SERVICE_PROCESS, USERNAME_FIELD_ID,
    WINDOW_PANE_NAME, WINDOW_PROCESS, default_install_paths,
};
pub use driver::LoginAutomationDriver;
pub use error::LoginError;
pub use notifier::{LogNotifier, LoginNotifier};
pub use worker::{LoginJob, LoginWorker};
