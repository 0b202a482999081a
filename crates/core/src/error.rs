/// Domain error taxonomy shared by the stores and the session manager.
///
/// `Invalid` is deliberately opaque: missing, expired, revoked, and
/// tampered tokens are all reported identically so a caller cannot
/// distinguish a forged credential from an expired one.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Not found")]
    NotFound,

    #[error("Login already exists")]
    DuplicateLogin,

    #[error("User does not exist")]
    UserNotFound,

    #[error("Invalid session")]
    Invalid,

    #[error("Concurrent update lost")]
    ConcurrencyConflict,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),
}
