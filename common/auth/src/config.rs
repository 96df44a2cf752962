use std::fmt;

use chrono::Duration;

/// Default lifetime of an access token: one working day.
pub const DEFAULT_ACCESS_TTL_HOURS: i64 = 8;

/// Upper bound on clock skew tolerance; larger values are clamped.
pub const MAX_LEEWAY_SECONDS: u32 = 3600;

/// Runtime configuration shared by the token signer and verifier.
#[derive(Clone)]
pub struct JwtConfig {
    /// Shared HS256 secret used for both signing and verification.
    pub secret: Vec<u8>,
    /// Lifetime applied by [`crate::TokenSigner::issue`].
    pub access_ttl: Duration,
    /// Allowable clock skew in seconds when validating exp.
    pub leeway_seconds: u32,
}

impl JwtConfig {
    /// Construct config with the default 8 hour TTL and no leeway.
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self {
            secret: secret.into(),
            access_ttl: Duration::hours(DEFAULT_ACCESS_TTL_HOURS),
            leeway_seconds: 0,
        }
    }

    pub fn with_access_ttl(mut self, ttl: Duration) -> Self {
        self.access_ttl = ttl;
        self
    }

    /// Adjust the allowed leeway, capped at [`MAX_LEEWAY_SECONDS`].
    pub fn with_leeway(mut self, seconds: u32) -> Self {
        self.leeway_seconds = seconds.min(MAX_LEEWAY_SECONDS);
        self
    }
}

impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("access_ttl", &self.access_ttl)
            .field("leeway_seconds", &self.leeway_seconds)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_eight_hours_without_leeway() {
        let config = JwtConfig::new("secret");
        assert_eq!(config.access_ttl, Duration::hours(8));
        assert_eq!(config.leeway_seconds, 0);
    }

    #[test]
    fn leeway_is_capped() {
        let config = JwtConfig::new("secret").with_leeway(4_000_000_000);
        assert_eq!(config.leeway_seconds, MAX_LEEWAY_SECONDS);
        assert_eq!(JwtConfig::new("secret").with_leeway(30).leeway_seconds, 30);
    }

    #[test]
    fn debug_output_hides_secret() {
        let config = JwtConfig::new("super-secret-value");
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("super-secret-value"));
        assert!(rendered.contains("<redacted>"));
    }
}
