// Askama template definitions

use askama::Template;

use crate::listings::PropertyView;

// Home / filtered listing page
#[derive(Template)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub title: &'static str,
    pub properties: Vec<PropertyView>,
    pub suburbs: Vec<String>,
}

// Login template
#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub title: &'static str,
    pub error: Option<String>,
}

// Dashboard template
#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub title: &'static str,
    pub user: String,
}
