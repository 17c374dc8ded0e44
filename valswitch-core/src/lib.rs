// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Valswitch Core
//!
//! Core types, models, and traits shared by every Valswitch crate.
//!
//! - Domain models (accounts, rank profiles, regions)
//! - Error types
//! - Trait seams for the rank source and API key lookup
//! - Account field validation
//!
//! ## Key Types
//!
//! ### Accounts
//! - [`Account`] - A stored Riot account with login credential and rank state
//! - [`AccountIdentity`] - Case-insensitive `(game name, tag line)` pair
//! - [`RankSnapshot`] - The rank triple captured before a fetch
//!
//! ### Ranks
//! - [`RankProfile`] - Ephemeral result of a rank fetch
//! - [`Region`] - Server regions and their provider codes
//!
//! ### Seams
//! - [`RankSource`] - Anything that can fetch a [`RankProfile`]
//! - [`ApiKeySource`] - Anything that can hand out the rank API key

pub mod error;
pub mod models;
pub mod traits;
pub mod validation;

// Re-export error types
pub use error::{CoreError, RankFetchError};

// Re-export all model types
pub use models::{
    // Accounts
    Account,
    AccountIdentity,
    RankSnapshot,
    // Ranks
    FAILED_TO_LOAD,
    NO_PEAK,
    RankProfile,
    Region,
    SENTINEL_RANKS,
    UNKNOWN,
    UNRANKED,
    is_real_rank,
    is_sentinel_rank,
    is_unrated_label,
    provider_region_code,
};

// Re-export traits
pub use traits::{ApiKeySource, RankSource, StaticApiKey};

pub use validation::{AccountValidator, FieldError, ValidationReport};
