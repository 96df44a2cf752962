use std::fmt;

/// The single username/password pair allowed to log in.
///
/// Comparison is plain string equality. There is no hashing, throttling or
/// lockout; this is a demo credential, not an account store.
#[derive(Clone)]
pub struct CredentialStore {
    username: String,
    password: String,
}

impl CredentialStore {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn check(&self, username: &str, password: &str) -> bool {
        username == self.username && password == self.password
    }
}

impl fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialStore")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}
