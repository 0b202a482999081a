//! Session manager configuration.

use chrono::Duration;

/// Default session lifetime in seconds (24 hours).
const DEFAULT_TTL_SECS: i64 = 86_400;

/// Configuration for session issuance.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Session lifetime in seconds, applied when a caller does not
    /// pick a TTL explicitly and to sessions minted during refresh
    /// rotation.
    pub default_ttl_secs: i64,
}

impl SessionConfig {
    /// Load configuration from environment variables.
    ///
    /// | Env Var            | Required | Default |
    /// |--------------------|----------|---------|
    /// | `SESSION_TTL_SECS` | no       | `86400` |
    ///
    /// # Panics
    ///
    /// Panics if `SESSION_TTL_SECS` is set but not a positive integer.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let default_ttl_secs: i64 = std::env::var("SESSION_TTL_SECS")
            .unwrap_or_else(|_| DEFAULT_TTL_SECS.to_string())
            .parse()
            .expect("SESSION_TTL_SECS must be a valid i64");
        assert!(
            default_ttl_secs > 0,
            "SESSION_TTL_SECS must be greater than zero"
        );

        Self { default_ttl_secs }
    }

    /// The default TTL as a [`Duration`].
    pub fn default_ttl(&self) -> Duration {
        Duration::seconds(self.default_ttl_secs)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            default_ttl_secs: DEFAULT_TTL_SECS,
        }
    }
}
