pub mod auth;
pub mod config;
pub mod db;
pub mod listings;
pub mod session;
pub mod web;

pub use db::DbPool;

use axum_extra::extract::cookie::Key;
use config::Config;
use std::sync::Arc;

use crate::auth::{CredentialVerifier, StaticCredentials};
use crate::session::SessionStore;

pub struct AppState {
    pub config: Config,
    pub db: DbPool,
    pub sessions: Arc<SessionStore>,
    pub credentials: Arc<dyn CredentialVerifier>,
    pub cookie_key: Key,
}

impl AppState {
    pub fn new(config: Config, db: DbPool) -> Self {
        let credentials = Arc::new(StaticCredentials::from(&config.auth));
        let cookie_key = session::signing_key(&config.auth.session_secret);
        Self {
            config,
            db,
            sessions: Arc::new(SessionStore::new()),
            credentials,
            cookie_key,
        }
    }

    /// Replace the credential check used by the login form
    pub fn with_credentials(mut self, credentials: Arc<dyn CredentialVerifier>) -> Self {
        self.credentials = credentials;
        self
    }
}
