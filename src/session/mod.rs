//! Server-side sessions keyed by a signed cookie.
//!
//! Every request carries a [`Session`], reached through `Extension<Session>`.
//! A request without a valid session cookie gets an anonymous session that
//! is only stored, and only handed out as a `Set-Cookie`, once a handler
//! writes to it.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::{Cookie, Key, SameSite, SignedCookieJar};
use dashmap::DashMap;
use sha2::{Digest, Sha512};
use std::sync::Arc;
use tracing::debug;

use crate::AppState;

// Session cookie name
pub const SESSION_COOKIE: &str = "realty_session";

#[derive(Debug, Clone, Default)]
pub struct SessionData {
    pub user: Option<String>,
}

/// In-memory session records. Sessions are never expired or removed.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: DashMap<String, SessionData>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fresh id for a session that has not been stored yet
    pub fn new_id() -> String {
        uuid::Uuid::new_v4().to_string()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.sessions.contains_key(id)
    }

    pub fn user(&self, id: &str) -> Option<String> {
        self.sessions.get(id).and_then(|s| s.user.clone())
    }

    pub fn set_user(&self, id: &str, user: impl Into<String>) {
        self.sessions.entry(id.to_string()).or_default().user = Some(user.into());
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

/// Handle to the current request's session.
#[derive(Debug, Clone)]
pub struct Session {
    id: String,
    store: Arc<SessionStore>,
}

impl Session {
    pub fn new(id: String, store: Arc<SessionStore>) -> Self {
        Self { id, store }
    }

    pub fn user(&self) -> Option<String> {
        self.store.user(&self.id)
    }

    pub fn set_user(&self, user: impl Into<String>) {
        self.store.set_user(&self.id, user);
    }
}

/// Derive the cookie signing key from the configured secret.
pub fn signing_key(secret: &str) -> Key {
    let digest = Sha512::digest(secret.as_bytes());
    Key::from(digest.as_slice())
}

/// Middleware attaching a [`Session`] to every request
pub async fn session_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let jar = SignedCookieJar::from_headers(request.headers(), state.cookie_key.clone());

    let existing = jar
        .get(SESSION_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|id| state.sessions.contains(id));
    let is_new = existing.is_none();
    let id = existing.unwrap_or_else(SessionStore::new_id);

    request
        .extensions_mut()
        .insert(Session::new(id.clone(), state.sessions.clone()));

    let response = next.run(request).await;

    // Anonymous sessions nobody wrote to are dropped here
    if is_new && state.sessions.contains(&id) {
        debug!(session = %id, "Created session");
        let jar = jar.add(
            Cookie::build((SESSION_COOKIE, id))
                .path("/")
                .http_only(true)
                .same_site(SameSite::Lax)
                .build(),
        );
        return (jar, response).into_response();
    }

    response
}
