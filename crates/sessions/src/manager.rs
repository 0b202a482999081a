//! The session lifecycle state machine.
//!
//! A session is `ACTIVE` (not revoked, not expired), `EXPIRED` (past
//! `expires_at`; computed, never stored), or `REVOKED` (terminal).
//! Nothing leaves `EXPIRED` or `REVOKED`; callers obtain a fresh
//! session via [`SessionManager::issue`].

use authgate_core::error::AuthError;
use authgate_core::token;
use authgate_core::types::{DbId, Timestamp};
use authgate_db::error::classify_sqlx_error;
use authgate_db::models::session::{
    CreateSession, Session, MAX_IP_ADDRESS_LENGTH, MAX_USER_AGENT_LENGTH,
};
use authgate_db::repositories::SessionRepo;
use authgate_db::DbPool;
use chrono::{Duration, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::config::SessionConfig;

/// Provenance metadata recorded with a session.
///
/// Never consulted for authorization decisions.
#[derive(Debug, Clone, Default)]
pub struct SessionMetadata {
    pub user_agent: Option<String>,
    pub ip_address: Option<String>,
}

/// The result of issuing a session.
///
/// Carries the raw access and refresh tokens; they are returned to the
/// caller exactly once and are never retrievable again.
#[derive(Debug, Serialize)]
pub struct IssuedSession {
    pub session_id: DbId,
    pub access_token: String,
    pub refresh_token: String,
}

/// Session details returned by a successful validation.
#[derive(Debug, Clone, Serialize)]
pub struct SessionInfo {
    pub session_id: DbId,
    pub user_id: DbId,
    pub user_agent: Option<String>,
    pub ip_address: Option<String>,
    pub created_at: Timestamp,
    pub expires_at: Timestamp,
    pub last_used_at: Option<Timestamp>,
}

impl From<Session> for SessionInfo {
    fn from(session: Session) -> Self {
        Self {
            session_id: session.session_id,
            user_id: session.user_id,
            user_agent: session.user_agent,
            ip_address: session.ip_address,
            created_at: session.created_at,
            expires_at: session.expires_at,
            last_used_at: session.last_used_at,
        }
    }
}

/// Issues, validates, refreshes, and revokes sessions.
///
/// Stateless: holds only the injected pool and configuration, so one
/// instance is safely shared across concurrent request workers and
/// across process instances sharing the store. Same-session races are
/// settled by the store's compare-and-swap on `is_revoked`.
pub struct SessionManager {
    pool: DbPool,
    config: SessionConfig,
}

impl SessionManager {
    pub fn new(pool: DbPool, config: SessionConfig) -> Self {
        Self { pool, config }
    }

    /// Create a new session for `user_id`.
    ///
    /// Generates the session id and both tokens from a CSPRNG, stores
    /// the refresh token only as its digest, and returns the raw
    /// tokens. `ttl` falls back to the configured default when `None`.
    ///
    /// Fails with [`AuthError::UserNotFound`] if `user_id` has no row;
    /// no session is written in that case.
    pub async fn issue(
        &self,
        user_id: DbId,
        metadata: &SessionMetadata,
        ttl: Option<Duration>,
    ) -> Result<IssuedSession, AuthError> {
        let ttl = ttl.unwrap_or_else(|| self.config.default_ttl());
        let (record, issued) = mint_session(user_id, metadata, ttl)?;
        SessionRepo::insert(&self.pool, &record).await?;
        tracing::debug!(session_id = %issued.session_id, %user_id, "session issued");
        Ok(issued)
    }

    /// Validate an access token.
    ///
    /// Missing, revoked, and expired tokens all fail with
    /// [`AuthError::Invalid`] -- the reasons are indistinguishable to
    /// the caller. On success `last_used_at` is updated best-effort: a
    /// failed update is logged and does not fail the validation.
    pub async fn validate(&self, access_token: &str) -> Result<SessionInfo, AuthError> {
        let session = SessionRepo::find_by_access_token(&self.pool, access_token)
            .await?
            .ok_or(AuthError::Invalid)?;

        let now = Utc::now();
        if !session.is_valid_at(now) {
            return Err(AuthError::Invalid);
        }

        let mut info = SessionInfo::from(session);
        match SessionRepo::touch_last_used(&self.pool, info.session_id, now).await {
            Ok(()) => info.last_used_at = Some(now),
            Err(err) => {
                tracing::warn!(session_id = %info.session_id, error = %err, "failed to record session use");
            }
        }
        Ok(info)
    }

    /// Rotate a session: verify the refresh token, revoke the old
    /// session, and issue a replacement inheriting the user and
    /// metadata -- all atomically, so a stolen refresh token replays
    /// at most once.
    ///
    /// Presenting a wrong or stale refresh token revokes the session
    /// defensively (a replayed token implies compromise) and fails
    /// with [`AuthError::Invalid`]. A lost race is retried once, then
    /// surfaces as `Invalid` as well.
    pub async fn refresh(
        &self,
        session_id: DbId,
        refresh_token: &str,
    ) -> Result<IssuedSession, AuthError> {
        match self.try_rotate(session_id, refresh_token).await {
            Err(AuthError::ConcurrencyConflict) => {
                match self.try_rotate(session_id, refresh_token).await {
                    Err(AuthError::ConcurrencyConflict) => Err(AuthError::Invalid),
                    other => other,
                }
            }
            other => other,
        }
    }

    async fn try_rotate(
        &self,
        session_id: DbId,
        refresh_token: &str,
    ) -> Result<IssuedSession, AuthError> {
        let session = SessionRepo::find_by_id(&self.pool, session_id)
            .await?
            .ok_or(AuthError::Invalid)?;

        let now = Utc::now();
        let presented = token::hash_token(refresh_token);
        if !session.is_valid_at(now) || presented != session.refresh_token_hash {
            // Reuse detection: burn the session rather than leave a
            // possibly-compromised refresh token standing.
            SessionRepo::revoke(&self.pool, session_id).await?;
            tracing::warn!(%session_id, "refresh rejected, session revoked");
            return Err(AuthError::Invalid);
        }

        let metadata = SessionMetadata {
            user_agent: session.user_agent.clone(),
            ip_address: session.ip_address.clone(),
        };
        let (record, issued) = mint_session(session.user_id, &metadata, self.config.default_ttl())?;

        let mut tx = self.pool.begin().await.map_err(classify_sqlx_error)?;
        if !SessionRepo::claim_for_rotation(&mut *tx, session_id).await? {
            // Dropping the transaction rolls back; the winner's state
            // is untouched.
            return Err(AuthError::ConcurrencyConflict);
        }
        SessionRepo::insert(&mut *tx, &record).await?;
        tx.commit().await.map_err(classify_sqlx_error)?;

        tracing::debug!(old = %session_id, new = %issued.session_id, "session rotated");
        Ok(issued)
    }

    /// Revoke a session. Idempotent.
    pub async fn revoke(&self, session_id: DbId) -> Result<(), AuthError> {
        if SessionRepo::revoke(&self.pool, session_id).await? {
            tracing::debug!(%session_id, "session revoked");
        }
        Ok(())
    }

    /// Revoke every non-revoked session for a user ("log out
    /// everywhere"). Idempotent; returns the count newly revoked.
    pub async fn revoke_all_for_user(&self, user_id: DbId) -> Result<u64, AuthError> {
        let revoked = SessionRepo::revoke_all_for_user(&self.pool, user_id).await?;
        if revoked > 0 {
            tracing::debug!(%user_id, revoked, "revoked all sessions for user");
        }
        Ok(revoked)
    }

    /// Enumerate a user's sessions, newest first, revoked ones
    /// included.
    pub async fn sessions_for_user(&self, user_id: DbId) -> Result<Vec<SessionInfo>, AuthError> {
        let sessions = SessionRepo::find_by_user_id(&self.pool, user_id).await?;
        Ok(sessions.into_iter().map(SessionInfo::from).collect())
    }

    /// Physically delete sessions expired before `cutoff`. Maintenance
    /// hook; the cutoff encodes the caller's retention policy.
    pub async fn purge_expired(&self, cutoff: Timestamp) -> Result<u64, AuthError> {
        let deleted = SessionRepo::delete_expired_before(&self.pool, cutoff).await?;
        if deleted > 0 {
            tracing::debug!(deleted, "purged expired sessions");
        }
        Ok(deleted)
    }
}

/// Build the insert record and the caller-facing token bundle for a
/// new session. Pure; does not touch the store.
fn mint_session(
    user_id: DbId,
    metadata: &SessionMetadata,
    ttl: Duration,
) -> Result<(CreateSession, IssuedSession), AuthError> {
    if ttl <= Duration::zero() {
        return Err(AuthError::Validation(
            "session ttl must be positive".into(),
        ));
    }
    if let Some(user_agent) = &metadata.user_agent {
        if user_agent.chars().count() > MAX_USER_AGENT_LENGTH {
            return Err(AuthError::Validation(format!(
                "user agent must be at most {MAX_USER_AGENT_LENGTH} characters"
            )));
        }
    }
    if let Some(ip_address) = &metadata.ip_address {
        if ip_address.chars().count() > MAX_IP_ADDRESS_LENGTH {
            return Err(AuthError::Validation(format!(
                "ip address must be at most {MAX_IP_ADDRESS_LENGTH} characters"
            )));
        }
    }

    let now = Utc::now();
    let session_id = Uuid::new_v4();
    let access_token = token::generate_token();
    let refresh_token = token::generate_token();

    let record = CreateSession {
        session_id,
        user_id,
        access_token: access_token.clone(),
        refresh_token_hash: token::hash_token(&refresh_token),
        user_agent: metadata.user_agent.clone(),
        ip_address: metadata.ip_address.clone(),
        created_at: now,
        expires_at: now + ttl,
    };
    let issued = IssuedSession {
        session_id,
        access_token,
        refresh_token,
    };
    Ok((record, issued))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn mint_rejects_non_positive_ttl() {
        let result = mint_session(Uuid::new_v4(), &SessionMetadata::default(), Duration::zero());
        assert_matches!(result, Err(AuthError::Validation(_)));

        let result = mint_session(
            Uuid::new_v4(),
            &SessionMetadata::default(),
            Duration::seconds(-5),
        );
        assert_matches!(result, Err(AuthError::Validation(_)));
    }

    #[test]
    fn mint_rejects_oversized_metadata() {
        let metadata = SessionMetadata {
            user_agent: Some("x".repeat(MAX_USER_AGENT_LENGTH + 1)),
            ip_address: None,
        };
        let result = mint_session(Uuid::new_v4(), &metadata, Duration::hours(1));
        assert_matches!(result, Err(AuthError::Validation(_)));

        let metadata = SessionMetadata {
            user_agent: None,
            ip_address: Some("f".repeat(MAX_IP_ADDRESS_LENGTH + 1)),
        };
        let result = mint_session(Uuid::new_v4(), &metadata, Duration::hours(1));
        assert_matches!(result, Err(AuthError::Validation(_)));
    }

    #[test]
    fn mint_stores_hash_not_refresh_token() {
        let (record, issued) =
            mint_session(Uuid::new_v4(), &SessionMetadata::default(), Duration::hours(1))
                .expect("mint should succeed");

        assert_eq!(record.session_id, issued.session_id);
        assert_eq!(record.access_token, issued.access_token);
        assert_ne!(record.refresh_token_hash, issued.refresh_token);
        assert_eq!(record.refresh_token_hash, token::hash_token(&issued.refresh_token));
        assert!(record.expires_at > record.created_at);
    }
}
