//! `HenrikDev` rank API provider.
//!
//! Looks up competitive ranks through the unofficial `HenrikDev` Valorant API.
//! The API key is sent verbatim in the `Authorization` header.

mod api;
mod error;
pub(crate) mod parser;

pub use api::{HENRIKDEV_API_BASE, HenrikDevClient};
pub use error::HenrikDevError;
