//! Repositories: one zero-sized struct per table with async associated
//! functions taking a `&PgPool`.

mod complaint_repo;
mod profile_repo;
mod session_repo;
mod user_repo;

pub use complaint_repo::ComplaintRepo;
pub use profile_repo::ProfileRepo;
pub use session_repo::SessionRepo;
pub use user_repo::UserRepo;
