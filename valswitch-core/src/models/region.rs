//! Server regions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// A Valorant server region as stored on accounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Region {
    /// Asia Pacific.
    #[default]
    Ap,
    /// North America.
    Na,
    /// Europe.
    Eu,
    /// Korea.
    Kr,
    /// Brazil.
    Br,
    /// Latin America.
    Latam,
}

impl Region {
    /// Region used when a code is not recognized.
    pub const FALLBACK: Self = Self::Ap;

    /// Every region, in display order.
    pub const ALL: [Self; 6] = [
        Self::Ap,
        Self::Na,
        Self::Eu,
        Self::Kr,
        Self::Br,
        Self::Latam,
    ];

    /// Internal code as stored on accounts ("NA", "LATAM", ...).
    pub fn code(self) -> &'static str {
        match self {
            Self::Ap => "AP",
            Self::Na => "NA",
            Self::Eu => "EU",
            Self::Kr => "KR",
            Self::Br => "BR",
            Self::Latam => "LATAM",
        }
    }

    /// Code used in rank API paths.
    pub fn provider_code(self) -> &'static str {
        match self {
            Self::Ap => "ap",
            Self::Na => "na",
            Self::Eu => "eu",
            Self::Kr => "kr",
            Self::Br => "br",
            Self::Latam => "latam",
        }
    }

    /// Human-readable name.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Ap => "Asia Pacific",
            Self::Na => "North America",
            Self::Eu => "Europe",
            Self::Kr => "Korea",
            Self::Br => "Brazil",
            Self::Latam => "Latin America",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Region {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim();
        Self::ALL
            .into_iter()
            .find(|r| r.code().eq_ignore_ascii_case(code))
            .ok_or_else(|| CoreError::InvalidRegion(s.to_string()))
    }
}

/// Maps a stored region code to the rank API code.
///
/// Anything unrecognized maps to the [`Region::FALLBACK`] code.
pub fn provider_region_code(code: &str) -> &'static str {
    code.parse::<Region>()
        .unwrap_or(Region::FALLBACK)
        .provider_code()
}
