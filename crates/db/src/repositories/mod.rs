//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods over
//! a Postgres executor. [`UserRepo`] is the credential store adapter;
//! [`SessionRepo`] is the session store adapter.

pub mod session_repo;
pub mod user_repo;

pub use session_repo::SessionRepo;
pub use user_repo::UserRepo;
