// Site pages - server-rendered with Askama templates

mod error;
mod templates;

use askama::Template;
use axum::{
    async_trait,
    extract::{FromRequest, Path, Request, State},
    http::header,
    middleware,
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Extension, Form, Json, Router,
};
use serde::Deserialize;
use std::convert::Infallible;
use std::sync::Arc;
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::{info, warn};

use crate::listings::{self, Listing, ListingScope};
use crate::session::{session_middleware, Session};
use crate::AppState;

pub use error::PageError;
pub use templates::*;

const HOME_ERROR: &str = "Error";
const FILTER_ERROR: &str = "An error occurred while filtering properties";
const PAGE_ERROR: &str = "Error";
const LOGIN_ERROR: &str = "Invalid Login.";

pub fn create_router(state: Arc<AppState>) -> Router {
    let static_files = ServeDir::new(&state.config.server.public_dir);

    Router::new()
        .route("/", get(home))
        .route("/filter/:suburb", get(filter))
        .route("/login", get(login_page).post(login_submit))
        .route("/dashboard", get(dashboard))
        .layer(middleware::from_fn_with_state(state.clone(), session_middleware))
        .fallback_service(static_files)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// Helper to render templates
fn render<T: Template>(template: &T) -> Result<Html<String>, askama::Error> {
    template.render().map(Html)
}

fn render_listing(listing: Listing) -> Result<Html<String>, askama::Error> {
    render(&HomeTemplate {
        title: "Home",
        properties: listing.properties,
        suburbs: listing.suburbs,
    })
}

// Home page
async fn home(State(state): State<Arc<AppState>>) -> Result<Html<String>, PageError> {
    let listing = listings::load(&state.db, &ListingScope::Home)
        .await
        .map_err(|e| PageError::new(HOME_ERROR, e))?;

    render_listing(listing).map_err(|e| PageError::new(HOME_ERROR, e))
}

// Suburb filter
async fn filter(
    State(state): State<Arc<AppState>>,
    Path(suburb): Path<String>,
) -> Result<Html<String>, PageError> {
    let scope = ListingScope::from_filter(&suburb);
    let listing = listings::load(&state.db, &scope)
        .await
        .map_err(|e| PageError::new(FILTER_ERROR, e))?;

    render_listing(listing).map_err(|e| PageError::new(FILTER_ERROR, e))
}

// Login page
async fn login_page() -> Result<Html<String>, PageError> {
    render(&LoginTemplate {
        title: "Login",
        error: None,
    })
    .map_err(|e| PageError::new(PAGE_ERROR, e))
}

#[derive(Debug, Default, Deserialize)]
struct LoginForm {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
}

/// Accepts url-encoded or JSON bodies. A missing, unknown or unparseable
/// body yields empty credentials, which then fail the check.
#[async_trait]
impl<S> FromRequest<S> for LoginForm
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();

        let form = if content_type.starts_with("application/json") {
            Json::<LoginForm>::from_request(req, state)
                .await
                .map(|Json(form)| form)
                .ok()
        } else if content_type.starts_with("application/x-www-form-urlencoded") {
            Form::<LoginForm>::from_request(req, state)
                .await
                .map(|Form(form)| form)
                .ok()
        } else {
            None
        };

        Ok(form.unwrap_or_default())
    }
}

// Login submit
async fn login_submit(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    form: LoginForm,
) -> Result<Response, PageError> {
    if state.credentials.verify(&form.username, &form.password) {
        session.set_user(&form.username);
        info!(user = %form.username, "Login succeeded");
        return Ok(Redirect::to("/dashboard").into_response());
    }

    warn!(user = %form.username, "Login failed");
    let page = render(&LoginTemplate {
        title: "Login",
        error: Some(LOGIN_ERROR.to_string()),
    })
    .map_err(|e| PageError::new(PAGE_ERROR, e))?;

    Ok(page.into_response())
}

// Dashboard (requires login)
async fn dashboard(Extension(session): Extension<Session>) -> Result<Response, PageError> {
    let Some(user) = session.user() else {
        return Ok(Redirect::to("/login").into_response());
    };

    let page = render(&DashboardTemplate {
        title: "Dashboard",
        user,
    })
    .map_err(|e| PageError::new(PAGE_ERROR, e))?;

    Ok(page.into_response())
}
