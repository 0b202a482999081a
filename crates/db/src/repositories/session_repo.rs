//! Repository for the `sessions` table (the session store).
//!
//! Methods take `impl PgExecutor` rather than a pool so the session
//! manager can run the rotation claim and the replacement insert
//! inside one transaction.

use authgate_core::error::AuthError;
use authgate_core::types::{DbId, Timestamp};
use sqlx::PgExecutor;

use crate::error::classify_sqlx_error;
use crate::models::session::{CreateSession, Session};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "session_id, user_id, access_token, refresh_token_hash, \
                        user_agent, ip_address, created_at, expires_at, is_revoked, last_used_at";

/// Provides persistence for session rows.
///
/// State classification (active / expired / revoked) is the session
/// manager's job; this store returns rows as they are.
pub struct SessionRepo;

impl SessionRepo {
    /// Insert a new session, returning the created row.
    ///
    /// Fails with [`AuthError::UserNotFound`] if `user_id` does not
    /// reference an existing user.
    pub async fn insert(
        ex: impl PgExecutor<'_>,
        input: &CreateSession,
    ) -> Result<Session, AuthError> {
        let query = format!(
            "INSERT INTO sessions (session_id, user_id, access_token, refresh_token_hash,
                                   user_agent, ip_address, created_at, expires_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Session>(&query)
            .bind(input.session_id)
            .bind(input.user_id)
            .bind(&input.access_token)
            .bind(&input.refresh_token_hash)
            .bind(&input.user_agent)
            .bind(&input.ip_address)
            .bind(input.created_at)
            .bind(input.expires_at)
            .fetch_one(ex)
            .await
            .map_err(classify_sqlx_error)
    }

    /// Index-backed point lookup by access token.
    pub async fn find_by_access_token(
        ex: impl PgExecutor<'_>,
        access_token: &str,
    ) -> Result<Option<Session>, AuthError> {
        let query = format!("SELECT {COLUMNS} FROM sessions WHERE access_token = $1");
        sqlx::query_as::<_, Session>(&query)
            .bind(access_token)
            .fetch_optional(ex)
            .await
            .map_err(classify_sqlx_error)
    }

    /// Find a session by its identifier.
    pub async fn find_by_id(
        ex: impl PgExecutor<'_>,
        session_id: DbId,
    ) -> Result<Option<Session>, AuthError> {
        let query = format!("SELECT {COLUMNS} FROM sessions WHERE session_id = $1");
        sqlx::query_as::<_, Session>(&query)
            .bind(session_id)
            .fetch_optional(ex)
            .await
            .map_err(classify_sqlx_error)
    }

    /// All sessions for a user, newest first, revoked ones included.
    pub async fn find_by_user_id(
        ex: impl PgExecutor<'_>,
        user_id: DbId,
    ) -> Result<Vec<Session>, AuthError> {
        let query =
            format!("SELECT {COLUMNS} FROM sessions WHERE user_id = $1 ORDER BY created_at DESC");
        sqlx::query_as::<_, Session>(&query)
            .bind(user_id)
            .fetch_all(ex)
            .await
            .map_err(classify_sqlx_error)
    }

    /// Atomically claim a session for rotation.
    ///
    /// Compare-and-swap on `is_revoked`: of two concurrent claims on
    /// the same row, exactly one observes `is_revoked = false` and
    /// wins. Returns `false` when the claim lost or the session is
    /// already expired.
    pub async fn claim_for_rotation(
        ex: impl PgExecutor<'_>,
        session_id: DbId,
    ) -> Result<bool, AuthError> {
        let result = sqlx::query(
            "UPDATE sessions SET is_revoked = true
             WHERE session_id = $1 AND is_revoked = false AND expires_at > NOW()",
        )
        .bind(session_id)
        .execute(ex)
        .await
        .map_err(classify_sqlx_error)?;
        Ok(result.rows_affected() > 0)
    }

    /// Revoke a single session. Returns `true` if the row transitioned.
    ///
    /// Idempotent: revoking an already-revoked session succeeds with
    /// `false`.
    pub async fn revoke(ex: impl PgExecutor<'_>, session_id: DbId) -> Result<bool, AuthError> {
        let result = sqlx::query(
            "UPDATE sessions SET is_revoked = true WHERE session_id = $1 AND is_revoked = false",
        )
        .bind(session_id)
        .execute(ex)
        .await
        .map_err(classify_sqlx_error)?;
        Ok(result.rows_affected() > 0)
    }

    /// Revoke all non-revoked sessions for a user. Returns the count
    /// of sessions newly revoked.
    pub async fn revoke_all_for_user(
        ex: impl PgExecutor<'_>,
        user_id: DbId,
    ) -> Result<u64, AuthError> {
        let result = sqlx::query(
            "UPDATE sessions SET is_revoked = true
             WHERE user_id = $1 AND is_revoked = false",
        )
        .bind(user_id)
        .execute(ex)
        .await
        .map_err(classify_sqlx_error)?;
        Ok(result.rows_affected())
    }

    /// Record a successful validation.
    pub async fn touch_last_used(
        ex: impl PgExecutor<'_>,
        session_id: DbId,
        at: Timestamp,
    ) -> Result<(), AuthError> {
        sqlx::query("UPDATE sessions SET last_used_at = $2 WHERE session_id = $1")
            .bind(session_id)
            .bind(at)
            .execute(ex)
            .await
            .map_err(classify_sqlx_error)?;
        Ok(())
    }

    /// Physically delete sessions whose `expires_at` is older than the
    /// cutoff, revoked ones included. Returns the count of deleted
    /// rows.
    ///
    /// The caller's cutoff encodes the retention policy; expiry itself
    /// is logical and never deletes rows.
    pub async fn delete_expired_before(
        ex: impl PgExecutor<'_>,
        cutoff: Timestamp,
    ) -> Result<u64, AuthError> {
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at < $1")
            .bind(cutoff)
            .execute(ex)
            .await
            .map_err(classify_sqlx_error)?;
        Ok(result.rows_affected())
    }
}
