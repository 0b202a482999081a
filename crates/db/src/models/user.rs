//! User entity model and DTOs.

use authgate_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// Maximum length of a login in characters.
pub const MAX_LOGIN_LENGTH: usize = 20;

/// Full user row from the `users` table.
///
/// Contains the password digest -- never expose this struct outside
/// the authentication boundary.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub user_id: DbId,
    pub userlogin: String,
    pub password_hash: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new user.
///
/// `password_hash` is the fixed 64-hex-character digest computed by
/// the account-management collaborator; this crate never sees the
/// plaintext password.
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub userlogin: String,
    pub password_hash: String,
}
