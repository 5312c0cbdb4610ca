//! Complaint status values and submission validation.
//!
//! Status names must match the `CHECK` constraint on `complaints.status`.
//! Admins may move a complaint between any two statuses; there is no
//! forward-only ordering and no terminal state.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Status constants
// ---------------------------------------------------------------------------

/// Initial status, assigned by the database on insert.
pub const STATUS_PENDING: &str = "pending";
/// An admin has opened the complaint.
pub const STATUS_SEEN: &str = "seen";
/// Work on the complaint is under way.
pub const STATUS_RESOLVING: &str = "resolving";
/// The complaint has been dealt with.
pub const STATUS_RESOLVED: &str = "resolved";

/// All valid complaint statuses.
pub const VALID_STATUSES: &[&str] = &[
    STATUS_PENDING,
    STATUS_SEEN,
    STATUS_RESOLVING,
    STATUS_RESOLVED,
];

// ---------------------------------------------------------------------------
// Validation constants
// ---------------------------------------------------------------------------

/// Maximum length of the short reason line (characters).
pub const MAX_REASON_LENGTH: usize = 200;

/// Maximum length of the free-text details (characters).
pub const MAX_DETAILS_LENGTH: usize = 10_000;

// ---------------------------------------------------------------------------
// ComplaintStatus
// ---------------------------------------------------------------------------

/// Triage state of a complaint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComplaintStatus {
    #[default]
    Pending,
    Seen,
    Resolving,
    Resolved,
}

impl ComplaintStatus {
    pub const ALL: [ComplaintStatus; 4] = [
        ComplaintStatus::Pending,
        ComplaintStatus::Seen,
        ComplaintStatus::Resolving,
        ComplaintStatus::Resolved,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ComplaintStatus::Pending => STATUS_PENDING,
            ComplaintStatus::Seen => STATUS_SEEN,
            ComplaintStatus::Resolving => STATUS_RESOLVING,
            ComplaintStatus::Resolved => STATUS_RESOLVED,
        }
    }

    /// Human-readable label shown next to the status badge.
    pub fn label(self) -> &'static str {
        match self {
            ComplaintStatus::Pending => "Pending Review",
            ComplaintStatus::Seen => "Complaint Seen",
            ComplaintStatus::Resolving => "Resolving Complaint",
            ComplaintStatus::Resolved => "Complaint Resolved",
        }
    }
}

impl fmt::Display for ComplaintStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComplaintStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ComplaintStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Invalid complaint status '{s}'. Must be one of: {VALID_STATUSES:?}"
                ))
            })
    }
}

impl TryFrom<String> for ComplaintStatus {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

// ---------------------------------------------------------------------------
// Submission validation
// ---------------------------------------------------------------------------

/// Validate the reason line. Returns the trimmed value.
pub fn validate_reason(reason: &str) -> Result<&str, CoreError> {
    validate_text("Reason", reason, MAX_REASON_LENGTH)
}

/// Validate the details text. Returns the trimmed value.
pub fn validate_details(details: &str) -> Result<&str, CoreError> {
    validate_text("Details", details, MAX_DETAILS_LENGTH)
}

fn validate_text<'a>(field: &str, value: &'a str, max: usize) -> Result<&'a str, CoreError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(format!("{field} is required")));
    }
    let len = trimmed.chars().count();
    if len > max {
        return Err(CoreError::Validation(format!(
            "{field} exceeds maximum length of {max} characters (got {len})"
        )));
    }
    Ok(trimmed)
}
