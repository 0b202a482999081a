//! Repository for the `users` table (the credential store).

use authgate_core::error::AuthError;
use authgate_core::types::DbId;
use sqlx::PgPool;

use crate::error::classify_sqlx_error;
use crate::models::user::{CreateUser, User, MAX_LOGIN_LENGTH};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "user_id, userlogin, password_hash, created_at, updated_at";

/// Provides lookup and creation for user credentials.
///
/// Password changes are owned by an external collaborator and are not
/// part of this store's contract.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user, returning the created row.
    ///
    /// Fails with [`AuthError::DuplicateLogin`] if the login is taken,
    /// and with [`AuthError::Validation`] if the login exceeds the
    /// schema's 20-character limit.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, AuthError> {
        if input.userlogin.chars().count() > MAX_LOGIN_LENGTH {
            return Err(AuthError::Validation(format!(
                "login must be at most {MAX_LOGIN_LENGTH} characters"
            )));
        }
        let query = format!(
            "INSERT INTO users (userlogin, password_hash)
             VALUES ($1, $2)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.userlogin)
            .bind(&input.password_hash)
            .fetch_one(pool)
            .await
            .map_err(classify_sqlx_error)
    }

    /// Find a user by internal ID.
    pub async fn find_by_id(pool: &PgPool, user_id: DbId) -> Result<Option<User>, AuthError> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE user_id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
            .map_err(classify_sqlx_error)
    }

    /// Find a user by login (case-sensitive).
    pub async fn find_by_login(pool: &PgPool, login: &str) -> Result<Option<User>, AuthError> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE userlogin = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(login)
            .fetch_optional(pool)
            .await
            .map_err(classify_sqlx_error)
    }
}
