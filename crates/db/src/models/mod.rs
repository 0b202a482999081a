//! Row structs and insert DTOs.
//!
//! Each submodule contains a `FromRow` entity struct matching the
//! database row and a create DTO for inserts.

pub mod session;
pub mod user;
