//! HenrikDev response parser.

use chrono::Utc;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};
use valswitch_core::{NO_PEAK, RankProfile, UNKNOWN};

// ============================================================================
// Success Body
// ============================================================================

#[derive(Debug, Deserialize)]
struct MmrResponse {
    #[serde(default)]
    data: Option<MmrData>,
}

#[derive(Debug, Deserialize)]
struct MmrData {
    #[serde(default)]
    current_data: Option<CurrentData>,
}

#[derive(Debug, Deserialize)]
struct CurrentData {
    #[serde(default)]
    currenttierpatched: Option<String>,
    #[serde(default)]
    elo: Option<i64>,
    /// Usually a tier string; some API revisions send `{ "patched_tier": .. }`.
    #[serde(default)]
    highest_rank: Option<Value>,
}

fn peak_label(value: Option<&Value>) -> String {
    let label = match value {
        Some(Value::String(s)) => Some(s.as_str()),
        Some(Value::Object(map)) => map.get("patched_tier").and_then(Value::as_str),
        _ => None,
    };
    label
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(NO_PEAK)
        .to_string()
}

/// Parses a successful MMR body into a profile.
///
/// A body without `data.current_data` (or one that is not JSON at all) means
/// "no profile" and yields `None`.
pub fn parse_mmr_response(body: &str, username: &str, tag: &str, region: &str) -> Option<RankProfile> {
    debug!(len = body.len(), "Parsing MMR response");

    let response: MmrResponse = match serde_json::from_str(body) {
        Ok(response) => response,
        Err(e) => {
            warn!(error = %e, "MMR response is not valid JSON");
            return None;
        }
    };

    let Some(current) = response.data.and_then(|d| d.current_data) else {
        warn!(username = %username, tag = %tag, "No rank data in response");
        return None;
    };

    let rating = current
        .elo
        .and_then(|elo| i32::try_from(elo).ok())
        .unwrap_or(0);

    Some(RankProfile {
        username: username.to_string(),
        tag: tag.to_string(),
        region: region.to_string(),
        current_rank: current
            .currenttierpatched
            .unwrap_or_else(|| UNKNOWN.to_string()),
        peak_rank: peak_label(current.highest_rank.as_ref()),
        rank_rating: rating,
        fetched_at: Utc::now(),
    })
}

// ============================================================================
// Error Body
// ============================================================================

/// Error body shape: `{ "status": 429, "errors": [{ "message": ".." }] }`.
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    status: u16,
    #[serde(default)]
    errors: Vec<ErrorEntry>,
}

#[derive(Debug, Deserialize)]
struct ErrorEntry {
    #[serde(default)]
    message: Option<String>,
}

/// Parsed error body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiErrorBody {
    /// Status reported inside the body.
    pub status: u16,
    /// First error message, or "Unknown error".
    pub message: String,
}

/// Parses an error body. Returns `None` for anything not matching the shape.
pub fn parse_error_body(body: &str) -> Option<ApiErrorBody> {
    let response: ErrorResponse = serde_json::from_str(body).ok()?;
    let message = response
        .errors
        .into_iter()
        .next()
        .and_then(|e| e.message)
        .unwrap_or_else(|| "Unknown error".to_string());
    Some(ApiErrorBody {
        status: response.status,
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_profile() {
        let body = r#"{
            "status": 200,
            "data": {
                "name": "Foo", "tag": "1234",
                "current_data": {
                    "currenttierpatched": "Diamond 2",
                    "elo": 1742,
                    "highest_rank": "Immortal 1"
                }
            }
        }"#;
        let profile = parse_mmr_response(body, "Foo", "1234", "NA").unwrap();
        assert_eq!(profile.current_rank, "Diamond 2");
        assert_eq!(profile.rank_rating, 1742);
        assert_eq!(profile.peak_rank, "Immortal 1");
        assert_eq!(profile.region, "NA");
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let body = r#"{"data":{"current_data":{}}}"#;
        let profile = parse_mmr_response(body, "Foo", "1234", "NA").unwrap();
        assert_eq!(profile.current_rank, "Unknown");
        assert_eq!(profile.rank_rating, 0);
        assert_eq!(profile.peak_rank, "No Peak");
    }

    #[test]
    fn test_peak_rank_object_form() {
        let body = r#"{"data":{"current_data":{
            "currenttierpatched":"Gold 3",
            "highest_rank":{"patched_tier":"Platinum 2","tier":14}
        }}}"#;
        let profile = parse_mmr_response(body, "Foo", "1234", "EU").unwrap();
        assert_eq!(profile.peak_rank, "Platinum 2");
    }

    #[test]
    fn test_missing_path_is_no_profile() {
        assert!(parse_mmr_response(r#"{"status":200,"data":{}}"#, "Foo", "1", "NA").is_none());
        assert!(parse_mmr_response(r#"{"status":200}"#, "Foo", "1", "NA").is_none());
        assert!(parse_mmr_response("<html>", "Foo", "1", "NA").is_none());
    }

    #[test]
    fn test_parse_error_body() {
        let body = r#"{"status":429,"errors":[{"message":"Rate limit reached","code":0}]}"#;
        let parsed = parse_error_body(body).unwrap();
        assert_eq!(parsed.status, 429);
        assert_eq!(parsed.message, "Rate limit reached");

        let bare = parse_error_body(r#"{"status":404,"errors":[]}"#).unwrap();
        assert_eq!(bare.message, "Unknown error");

        assert!(parse_error_body("Bad Gateway").is_none());
    }
}
