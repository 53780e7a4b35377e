use crate::utils::error::ResolveError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default accepted shape: the portal's alphabet and length range.
pub const DEFAULT_CODE_PATTERN: &str = r"^[A-Z0-9]{6,20}$";

/// Shape rules a tracking code must satisfy before the portal is queried.
#[derive(Debug, Clone)]
pub struct CodeRules {
    pattern: Regex,
}

impl CodeRules {
    pub fn new(pattern: &str) -> std::result::Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
        })
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }
}

impl Default for CodeRules {
    fn default() -> Self {
        Self {
            pattern: Regex::new(DEFAULT_CODE_PATTERN).expect("default code pattern compiles"),
        }
    }
}

/// A permit tracking code that passed the shape check. Stored uppercased.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TrackingCode(String);

impl TrackingCode {
    pub fn parse(raw: &str, rules: &CodeRules) -> std::result::Result<Self, ResolveError> {
        let code = raw.trim().to_uppercase();
        if code.is_empty() {
            return Err(ResolveError::InvalidCode {
                code,
                reason: "code cannot be empty".to_string(),
            });
        }
        if !rules.pattern.is_match(&code) {
            return Err(ResolveError::InvalidCode {
                reason: format!("code must match {}", rules.pattern()),
                code,
            });
        }
        Ok(Self(code))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TrackingCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Expands a 6-digit short code with the two-digit `year` prefix
/// (`123456` in 2026 becomes `26123456`). Other input is trimmed and uppercased.
pub fn expand_short_code(raw: &str, year: i32) -> String {
    let code = raw.trim().to_uppercase();
    if code.len() == 6 && code.bytes().all(|b| b.is_ascii_digit()) {
        format!("{:02}{}", year.rem_euclid(100), code)
    } else {
        code
    }
}

/// Unprocessed portal content for one lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawPortalResponse {
    pub status: u16,
    pub body: String,
}

impl RawPortalResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Normalized processing state of a permit application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermitStatus {
    ReadyForPickup,
    BeingProcessed,
    NotStarted,
}

impl PermitStatus {
    pub fn title(&self) -> &'static str {
        match self {
            PermitStatus::ReadyForPickup => "Ready for Pickup",
            PermitStatus::BeingProcessed => "Being Processed",
            PermitStatus::NotStarted => "Not Yet Started",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            PermitStatus::ReadyForPickup => {
                "Your permit is ready. Book an appointment at your Questura to collect it."
            }
            PermitStatus::BeingProcessed => {
                "Your application is being processed. Check back periodically."
            }
            PermitStatus::NotStarted => {
                "No information found. Processing has not begun or the code may be wrong."
            }
        }
    }
}

impl fmt::Display for PermitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}
