//! Session lifecycle management.
//!
//! [`manager::SessionManager`] is the sole owner of session lifecycle
//! invariants: issuance, validation, refresh rotation, and revocation.
//! It is stateless and safe to share across request workers; the
//! database is the single source of truth.

pub mod config;
pub mod manager;

pub use config::SessionConfig;
pub use manager::{IssuedSession, SessionInfo, SessionManager, SessionMetadata};
