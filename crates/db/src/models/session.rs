//! Session model and DTOs.

use authgate_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// Maximum length of the stored user agent string.
pub const MAX_USER_AGENT_LENGTH: usize = 200;

/// Maximum length of the stored IP address (IPv6-capable).
pub const MAX_IP_ADDRESS_LENGTH: usize = 45;

/// A session row from the `sessions` table.
#[derive(Debug, Clone, FromRow)]
pub struct Session {
    pub session_id: DbId,
    pub user_id: DbId,
    pub access_token: String,
    pub refresh_token_hash: String,
    pub user_agent: Option<String>,
    pub ip_address: Option<String>,
    pub created_at: Timestamp,
    pub expires_at: Timestamp,
    pub is_revoked: bool,
    pub last_used_at: Option<Timestamp>,
}

impl Session {
    /// Whether the session is usable at `now`.
    ///
    /// Expiry is computed, never stored: a session past `expires_at`
    /// is invalid even while `is_revoked` is still false in storage.
    pub fn is_valid_at(&self, now: Timestamp) -> bool {
        !self.is_revoked && now < self.expires_at
    }
}

/// DTO for inserting a new session.
///
/// `created_at` is supplied by the caller so that `expires_at` is
/// derived from the same clock reading.
#[derive(Debug, Clone)]
pub struct CreateSession {
    pub session_id: DbId,
    pub user_id: DbId,
    pub access_token: String,
    pub refresh_token_hash: String,
    pub user_agent: Option<String>,
    pub ip_address: Option<String>,
    pub created_at: Timestamp,
    pub expires_at: Timestamp,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use uuid::Uuid;

    fn session(is_revoked: bool, expires_in: Duration) -> Session {
        let now = Utc::now();
        Session {
            session_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            access_token: "token".into(),
            refresh_token_hash: "0".repeat(64),
            user_agent: None,
            ip_address: None,
            created_at: now - Duration::hours(1),
            expires_at: now + expires_in,
            is_revoked,
            last_used_at: None,
        }
    }

    #[test]
    fn active_session_is_valid() {
        let s = session(false, Duration::hours(1));
        assert!(s.is_valid_at(Utc::now()));
    }

    #[test]
    fn revoked_session_is_invalid_despite_remaining_ttl() {
        let s = session(true, Duration::hours(1));
        assert!(!s.is_valid_at(Utc::now()));
    }

    #[test]
    fn expired_session_is_invalid_without_revocation() {
        let s = session(false, Duration::seconds(-1));
        assert!(!s.is_valid_at(Utc::now()));
    }

    #[test]
    fn validity_boundary_is_exclusive() {
        let s = session(false, Duration::zero());
        assert!(!s.is_valid_at(s.expires_at));
    }
}
