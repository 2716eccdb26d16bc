//! Credential checking for the dashboard login.

use crate::config::AuthConfig;

/// Decides whether a submitted username/password pair may log in.
pub trait CredentialVerifier: Send + Sync {
    fn verify(&self, username: &str, password: &str) -> bool;
}

/// Accepts exactly one configured username/password pair.
#[derive(Debug, Clone)]
pub struct StaticCredentials {
    username: String,
    password: String,
}

impl StaticCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl From<&AuthConfig> for StaticCredentials {
    fn from(config: &AuthConfig) -> Self {
        Self::new(&config.username, &config.password)
    }
}

impl CredentialVerifier for StaticCredentials {
    fn verify(&self, username: &str, password: &str) -> bool {
        username == self.username && password == self.password
    }
}
