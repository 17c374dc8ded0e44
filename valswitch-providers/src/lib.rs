// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Valswitch Providers
//!
//! Concrete integrations for the Valswitch account manager.
//!
//! - [`henrikdev`]: the HenrikDev MMR client, a [`valswitch_core::RankSource`]
//!   with retry, backoff and rate-limit handling
//! - [`riot_client`]: discovery, launch and login-form automation for the
//!   Riot Client
//!
//! ## Usage
//!
//! ```ignore
//! use valswitch_providers::HenrikDevClient;
//!
//! let client = HenrikDevClient::new()?;
//! let profile = client
//!     .fetch_profile("Foo", "1234", "NA", "HDEV-key", 3)
//!     .await?;
//! ```

pub mod henrikdev;
pub mod riot_client;

pub use henrikdev::{HENRIKDEV_API_BASE, HenrikDevClient, HenrikDevError};
pub use riot_client::{
    ClientConfig, LogNotifier, LoginAutomationDriver, LoginError, LoginJob, LoginNotifier,
    LoginTiming, LoginWorker,
};
