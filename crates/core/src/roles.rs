//! Profile roles and the single authorization check used by every
//! protected flow.
//!
//! Role names must match the `CHECK` constraint on `profiles.role` in
//! `20250101000001_create_profiles.sql`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

pub const ROLE_STUDENT: &str = "student";
pub const ROLE_STAFF: &str = "staff";
pub const ROLE_ADMIN: &str = "admin";

/// All valid role names.
pub const VALID_ROLES: &[&str] = &[ROLE_STUDENT, ROLE_STAFF, ROLE_ADMIN];

/// The role stored on a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Staff,
    Admin,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Student => ROLE_STUDENT,
            Role::Staff => ROLE_STAFF,
            Role::Admin => ROLE_ADMIN,
        }
    }

    /// Whether an account may pick this role for itself at registration.
    ///
    /// Admins are promoted out of band.
    pub fn is_self_assignable(self) -> bool {
        !matches!(self, Role::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ROLE_STUDENT => Ok(Role::Student),
            ROLE_STAFF => Ok(Role::Staff),
            ROLE_ADMIN => Ok(Role::Admin),
            other => Err(CoreError::Validation(format!(
                "Invalid role '{other}'. Must be one of: {VALID_ROLES:?}"
            ))),
        }
    }
}

impl TryFrom<String> for Role {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

// ---------------------------------------------------------------------------
// Capabilities
// ---------------------------------------------------------------------------

/// Something a session may want to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Submit a new complaint (any signed-in profile).
    SubmitComplaint,
    /// See every complaint and change its status.
    ReviewComplaints,
}

/// Outcome of [`authorize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    Granted,
    Denied,
}

impl AccessDecision {
    pub fn is_granted(self) -> bool {
        matches!(self, AccessDecision::Granted)
    }

    /// Convert into a `Result`, using `notice` as the denial message.
    pub fn require(self, notice: &str) -> Result<(), CoreError> {
        match self {
            AccessDecision::Granted => Ok(()),
            AccessDecision::Denied => Err(CoreError::Forbidden(notice.to_string())),
        }
    }
}

/// Decide whether `role` holds `capability`.
pub fn authorize(role: Role, capability: Capability) -> AccessDecision {
    let granted = match capability {
        Capability::SubmitComplaint => true,
        Capability::ReviewComplaints => role == Role::Admin,
    };
    if granted {
        AccessDecision::Granted
    } else {
        AccessDecision::Denied
    }
}
