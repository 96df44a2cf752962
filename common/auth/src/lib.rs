pub mod claims;
pub mod config;
pub mod credentials;
pub mod error;
pub mod extractors;
pub mod signer;
pub mod verifier;

pub use claims::Claims;
pub use config::{JwtConfig, DEFAULT_ACCESS_TTL_HOURS, MAX_LEEWAY_SECONDS};
pub use credentials::CredentialStore;
pub use error::{AuthError, AuthResult, INVALID_TOKEN_DETAIL, NOT_AUTHENTICATED_DETAIL};
pub use extractors::AuthContext;
pub use signer::{IssuedToken, TokenSigner, TOKEN_TYPE};
pub use verifier::JwtVerifier;
