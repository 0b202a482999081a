//! Mapping from sqlx errors to the domain taxonomy.

use authgate_core::error::AuthError;

/// PostgreSQL error code for unique constraint violations.
const UNIQUE_VIOLATION: &str = "23505";

/// PostgreSQL error code for foreign key violations.
const FOREIGN_KEY_VIOLATION: &str = "23503";

/// Classify a sqlx error into the domain taxonomy.
///
/// Constraint violations surface as their domain meaning: a unique
/// violation is a duplicate login (`uq_users_userlogin` is the only
/// non-PK unique constraint), a foreign key violation is a missing
/// user (the only reference). Everything else is a store failure and
/// is never downgraded to an authentication decision.
pub fn classify_sqlx_error(err: sqlx::Error) -> AuthError {
    if let sqlx::Error::Database(ref db_err) = err {
        match db_err.code().as_deref() {
            Some(UNIQUE_VIOLATION) => return AuthError::DuplicateLogin,
            Some(FOREIGN_KEY_VIOLATION) => return AuthError::UserNotFound,
            _ => {}
        }
    }
    tracing::error!(error = %err, "database error");
    AuthError::StoreUnavailable(err.to_string())
}
