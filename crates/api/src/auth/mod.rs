//! Credential store primitives.
//!
//! - [`password`] -- Argon2id hashing for account passwords.
//! - [`jwt`] -- access tokens and refresh-token hashing.

pub mod jwt;
pub mod password;
