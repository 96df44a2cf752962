use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde_json::Value;
use tracing::debug;

use crate::claims::Claims;
use crate::config::JwtConfig;
use crate::error::{AuthError, AuthResult};

#[derive(Clone)]
pub struct JwtVerifier {
    config: JwtConfig,
    decoding_key: DecodingKey,
}

impl JwtVerifier {
    pub fn new(config: JwtConfig) -> Self {
        let decoding_key = DecodingKey::from_secret(&config.secret);
        Self {
            config,
            decoding_key,
        }
    }

    pub fn config(&self) -> &JwtConfig {
        &self.config
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = self.config.leeway_seconds.into();
        validation.validate_exp = true;
        validation.set_required_spec_claims(&["exp"]);
        validation
    }

    pub fn verify(&self, token: &str) -> AuthResult<Claims> {
        if token.trim().is_empty() {
            return Err(AuthError::InvalidAuthorization);
        }

        let token_data = decode::<Value>(token, &self.decoding_key, &self.validation())?;
        let claims = Claims::try_from(token_data.claims)?;
        debug!(subject = %claims.subject, "verified JWT successfully");
        Ok(claims)
    }

    /// Verifies `token` and returns only the authenticated username.
    pub fn verify_subject(&self, token: &str) -> AuthResult<String> {
        self.verify(token).map(|claims| claims.subject)
    }
}
