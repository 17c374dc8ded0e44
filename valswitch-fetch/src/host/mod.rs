//! Host APIs for talking to the operating system.
//!
//! - [`keychain`] - Secure credential storage (system keychain)
//! - [`process`] - Process discovery, launch and termination
//! - [`desktop`] - Window focus and form control automation

pub mod desktop;
pub mod keychain;
pub mod process;

// Re-export key types
pub use desktop::{AutomationSession, ControlId, DesktopAutomation, platform_automation};
pub use keychain::{KeychainApi, MemoryKeychain, SystemKeychain};
pub use process::{ClientProcessHost, SystemProcessHost};
