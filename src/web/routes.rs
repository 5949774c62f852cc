use askama::Template;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Form;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Deserialize;
use tracing::error;

use crate::analysis::Filter;
use crate::session::SessionHandle;
use super::state::AppState;
use super::view::DashboardTemplate;

pub const SESSION_COOKIE: &str = "readit_session";

/// Upstream failures surface as a plain 500 page.
pub struct AppError(anyhow::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Request failed: {:#}", self.0),
        )
            .into_response()
    }
}

impl<E: Into<anyhow::Error>> From<E> for AppError {
    fn from(err: E) -> Self {
        AppError(err.into())
    }
}

#[derive(Deserialize)]
pub struct DashboardQuery {
    filter: Option<String>,
}

#[derive(Deserialize)]
pub struct SearchForm {
    #[serde(default)]
    topic: String,
    #[serde(default)]
    subreddit: String,
}

#[derive(Deserialize)]
pub struct AnalyzeForm {
    /// One entry per ticked checkbox
    #[serde(default)]
    post: Vec<String>,
}

async fn session_for(state: &AppState, jar: CookieJar) -> (CookieJar, SessionHandle) {
    let current = jar.get(SESSION_COOKIE).map(|c| c.value().to_string());
    let (id, handle) = state.sessions.get_or_create(current.as_deref()).await;

    let jar = if current.as_deref() == Some(id.as_str()) {
        jar
    } else {
        jar.add(
            Cookie::build((SESSION_COOKIE, id))
                .path("/")
                .http_only(true)
                .same_site(SameSite::Lax),
        )
    };

    (jar, handle)
}

pub async fn dashboard(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(query): Query<DashboardQuery>,
) -> (CookieJar, Html<String>) {
    let (jar, handle) = session_for(&state, jar).await;
    let mut session = handle.lock().await;

    if let Some(filter) = query.filter.as_deref() {
        // Filter parsing never fails; unknown values mean "All".
        let filter: Filter = filter.parse().unwrap_or_default();
        session.set_filter(filter);
    }

    let template = DashboardTemplate::from_session(&mut session);
    let html = template
        .render()
        .unwrap_or_else(|e| format!("Template error: {}", e));

    (jar, Html(html))
}

pub async fn search(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<SearchForm>,
) -> Result<(CookieJar, Redirect), AppError> {
    let (jar, handle) = session_for(&state, jar).await;
    let mut session = handle.lock().await;

    if let Err(e) = state.flow.search(&mut session, &form.topic, &form.subreddit).await {
        error!("Search failed: {:#}", e);
        return Err(e.into());
    }

    Ok((jar, Redirect::to("/")))
}

pub async fn analyze(
    State(state): State<AppState>,
    jar: CookieJar,
    axum_extra::extract::Form(form): axum_extra::extract::Form<AnalyzeForm>,
) -> Result<(CookieJar, Redirect), AppError> {
    let (jar, handle) = session_for(&state, jar).await;
    let mut session = handle.lock().await;

    if let Err(e) = state.flow.analyze(&mut session, &form.post).await {
        error!("Analysis failed: {:#}", e);
        return Err(e.into());
    }

    Ok((jar, Redirect::to("/")))
}
