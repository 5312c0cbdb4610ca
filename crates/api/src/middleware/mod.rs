//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`] -- Resolves the caller's profile from a JWT Bearer token.
//! - [`rbac::RequireAdmin`] -- Requires the `ReviewComplaints` capability.
//! - [`rbac::RequireSubmitter`] -- Requires the `SubmitComplaint` capability.

pub mod auth;
pub mod rbac;
