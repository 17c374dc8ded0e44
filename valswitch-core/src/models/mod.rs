//! Domain models for Valswitch.
//!
//! ## Submodules
//!
//! - [`account`] - Stored accounts and their identity
//! - [`rank`] - Rank profiles and sentinel labels
//! - [`region`] - Server regions

mod account;
mod rank;
mod region;

pub use account::{Account, AccountIdentity, RankSnapshot};
pub use rank::{
    FAILED_TO_LOAD, NO_PEAK, RankProfile, SENTINEL_RANKS, UNKNOWN, UNRANKED, is_real_rank,
    is_sentinel_rank, is_unrated_label,
};
pub use region::{Region, provider_region_code};
