//! Request handlers, one submodule per page-level flow.
//!
//! Handlers delegate to the repositories in `complaints_db` and the object
//! store, and map errors via [`AppError`](crate::error::AppError).

pub mod admin;
pub mod auth;
pub mod complaints;
pub mod landing;
pub mod track;
