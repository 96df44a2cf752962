use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use tracing::debug;

use crate::claims::ClaimsRepr;
use crate::config::JwtConfig;
use crate::error::{AuthError, AuthResult};

pub const TOKEN_TYPE: &str = "bearer";

/// Mints HS256 access tokens carrying only `sub`, `iat` and `exp`.
pub struct TokenSigner {
    config: JwtConfig,
    encoding_key: EncodingKey,
}

#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub access_token: String,
    pub expires_at: DateTime<Utc>,
    pub expires_in: i64,
    pub token_type: &'static str,
}

impl TokenSigner {
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(&config.secret);
        Self {
            config,
            encoding_key,
        }
    }

    pub fn config(&self) -> &JwtConfig {
        &self.config
    }

    pub fn issue(&self, subject: &str) -> AuthResult<IssuedToken> {
        self.issue_with_ttl(subject, self.config.access_ttl)
    }

    /// Signs a token for `subject` that expires `ttl` from now. A negative
    /// TTL yields a token that is already expired.
    pub fn issue_with_ttl(&self, subject: &str, ttl: Duration) -> AuthResult<IssuedToken> {
        let now = Utc::now();
        let expires_at = now
            .checked_add_signed(ttl)
            .ok_or_else(|| AuthError::Signing(format!("expiry out of range for ttl {ttl}")))?;

        let claims = ClaimsRepr {
            sub: Some(subject.to_string()),
            exp: expires_at.timestamp(),
            iat: Some(now.timestamp()),
        };

        let access_token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|err| AuthError::Signing(err.to_string()))?;
        debug!(subject, exp = claims.exp, "issued access token");

        Ok(IssuedToken {
            access_token,
            expires_at,
            expires_in: ttl.num_seconds(),
            token_type: TOKEN_TYPE,
        })
    }
}
