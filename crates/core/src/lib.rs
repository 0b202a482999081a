//! Shared primitives for the session authentication core.
//!
//! This crate has no database dependency so the token and hashing
//! helpers can be used by repository, manager, and any future CLI
//! tooling alike.

pub mod error;
pub mod hashing;
pub mod token;
pub mod types;
