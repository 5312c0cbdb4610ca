//! Domain layer for the complaint desk.
//!
//! Pure types and rules shared by the database, storage and API crates.
//! Nothing in here performs I/O.

pub mod attachment;
pub mod complaint;
pub mod error;
pub mod roles;
pub mod ticket;
pub mod types;
