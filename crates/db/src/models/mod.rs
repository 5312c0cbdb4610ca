//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - `Deserialize` or plain DTOs for inserts and updates
//!
//! Status and role columns are TEXT; they are parsed into
//! [`ComplaintStatus`](complaints_core::complaint::ComplaintStatus) and
//! [`Role`](complaints_core::roles::Role) while decoding the row, so an
//! unknown value surfaces as a decode error here rather than downstream.

pub mod complaint;
pub mod profile;
pub mod session;
pub mod user;
