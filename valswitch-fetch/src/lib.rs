// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Valswitch Fetch
//!
//! HTTP plumbing and host APIs for Valswitch.
//!
//! ## HTTP
//!
//! - [`client::HttpClient`] - One-shot authenticated GETs with a fixed timeout
//! - [`retry::RetryStrategy`] - Jitter, backoff and rate-limit cooldown timings
//!
//! ## Host APIs
//!
//! The [`host`] module wraps everything that touches the operating system:
//!
//! - [`host::keychain`] - Secure credential storage (system keychain)
//! - [`host::process`] - Finding, launching and closing the game client
//! - [`host::desktop`] - Window focus and form control automation
//!
//! ## Credentials
//!
//! - [`vault::CredentialVault`] - OS-user-scoped password encryption

// Core modules
pub mod client;
pub mod error;
pub mod host;
pub mod retry;
pub mod vault;

// Errors
pub use error::{AutomationError, FetchError, KeychainError, ProcessError};

// Host APIs
pub use host::{
    desktop::{AutomationSession, ControlId, DesktopAutomation, platform_automation},
    keychain::{KeychainApi, MemoryKeychain, SystemKeychain},
    process::{ClientProcessHost, SystemProcessHost},
};

// HTTP
pub use client::{HttpClient, redact};
pub use retry::RetryStrategy;
pub use vault::{CredentialVault, VaultError};
