//! Field validation for user-entered account data.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::Region;

static GAME_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9\s]{3,16}$").expect("Invalid regex"));

static TAG_LINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9]{3,5}$").expect("Invalid regex"));

static USERNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_]{3,20}$").expect("Invalid regex"));

const MIN_PASSWORD_LEN: usize = 6;

/// One rejected field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Field name as shown to the user.
    pub field: &'static str,
    /// What is wrong with it.
    pub message: String,
}

/// Outcome of validating an account form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    /// Every rejected field, in form order.
    pub errors: Vec<FieldError>,
}

impl ValidationReport {
    /// Returns true when nothing was rejected.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn reject(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }
}

/// Validates account fields before they are stored.
pub struct AccountValidator;

impl AccountValidator {
    /// Validates a full add/edit form.
    pub fn validate(
        game_name: &str,
        tag_line: &str,
        username: &str,
        password: &str,
        region: &str,
    ) -> ValidationReport {
        let mut report = ValidationReport::default();

        if !GAME_NAME_RE.is_match(game_name) {
            report.reject(
                "Game Name",
                "Game name must be 3-16 characters, letters, numbers and spaces only",
            );
        }
        if !TAG_LINE_RE.is_match(tag_line) {
            report.reject("Tag Line", "Tag line must be 3-5 letters or numbers");
        }
        if !USERNAME_RE.is_match(username) {
            report.reject(
                "Username",
                "Username must be 3-20 characters, letters, numbers and underscores only",
            );
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            report.reject(
                "Password",
                format!("Password must be at least {MIN_PASSWORD_LEN} characters"),
            );
        }
        if region.parse::<Region>().is_err() {
            report.reject("Region", "Region must be one of AP, NA, EU, KR, BR, LATAM");
        }

        report
    }
}
