//! CLI command implementations.

pub mod accounts;
pub mod client;
pub mod config;
pub mod login;
pub mod rank;
