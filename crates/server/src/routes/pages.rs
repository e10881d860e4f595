//! Server-rendered pages for browser users: login, signup and a dashboard.
//!
//! Forms post back to the same path; success sets the session cookie and
//! redirects, failure re-renders the form with the error message.

use std::fmt::Write as _;

use axum::{
    Form,
    extract::State,
    http::header,
    response::{AppendHeaders, Html, IntoResponse, Redirect, Response},
};

use sitework_api::{LoginRequest, SignupRequest};
use sitework_core::Role;
use sitework_store::Store;

use crate::config::AppConfig;
use crate::error::ApiErr;
use crate::routes::auth::{self, AuthUser};

const STYLE: &str = "body{font-family:system-ui,sans-serif;max-width:760px;margin:2rem auto;padding:0 1rem;color:#222}\
form{display:grid;gap:.6rem;max-width:360px}\
input,select,button{padding:.45rem;font-size:1rem}\
table{border-collapse:collapse;width:100%}\
th,td{border-bottom:1px solid #ddd;padding:.4rem;text-align:left}\
.error{color:#b00020}";

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(title: &str, body: &str) -> Html<String> {
    Html(format!(
        "<!doctype html><html><head><meta charset=\"utf-8\">\
<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\
<title>{} · Sitework</title><style>{STYLE}</style></head><body>{body}</body></html>",
        escape(title)
    ))
}

fn error_banner(error: Option<&str>) -> String {
    error
        .map(|e| format!("<p class=\"error\">{}</p>", escape(e)))
        .unwrap_or_default()
}

fn login_form(error: Option<&str>, username: &str) -> Html<String> {
    layout(
        "Log in",
        &format!(
            "<h1>Log in</h1>{}\
<form method=\"post\" action=\"/login\">\
<input name=\"username\" placeholder=\"Username\" value=\"{}\" required>\
<input name=\"password\" type=\"password\" placeholder=\"Password\" required>\
<button type=\"submit\">Log in</button></form>\
<p>No account? <a href=\"/signup\">Sign up</a></p>",
            error_banner(error),
            escape(username)
        ),
    )
}

fn signup_form(error: Option<&str>, prev: Option<&SignupRequest>) -> Html<String> {
    let field = |f: fn(&SignupRequest) -> Option<&str>| {
        prev.and_then(f).map(escape).unwrap_or_default()
    };
    let selected_role = prev.map(|p| p.role.as_str()).unwrap_or("");
    let mut roles = String::new();
    for role in [Role::Owner, Role::FieldManager, Role::Engineer] {
        let selected = if role.as_str() == selected_role {
            " selected"
        } else {
            ""
        };
        let _ = write!(
            roles,
            "<option value=\"{0}\"{selected}>{0}</option>",
            role.as_str()
        );
    }
    layout(
        "Sign up",
        &format!(
            "<h1>Sign up</h1>{}\
<form method=\"post\" action=\"/signup\">\
<input name=\"username\" placeholder=\"Username\" value=\"{}\" required>\
<input name=\"password\" type=\"password\" placeholder=\"Password\" required>\
<input name=\"email\" type=\"email\" placeholder=\"Email\" value=\"{}\" required>\
<input name=\"first_name\" placeholder=\"First name\" value=\"{}\" required>\
<input name=\"last_name\" placeholder=\"Last name\" value=\"{}\" required>\
<input name=\"phone\" placeholder=\"Phone (optional)\" value=\"{}\">\
<select name=\"role\">{roles}</select>\
<input name=\"company_name\" placeholder=\"Company name (owners)\" value=\"{}\">\
<button type=\"submit\">Create account</button></form>\
<p>Already registered? <a href=\"/login\">Log in</a></p>",
            error_banner(error),
            field(|p| Some(p.username.as_str())),
            field(|p| Some(p.email.as_str())),
            field(|p| Some(p.first_name.as_str())),
            field(|p| Some(p.last_name.as_str())),
            field(|p| p.phone.as_deref()),
            field(|p| p.company_name.as_deref()),
        ),
    )
}

/// Session cookie plus a redirect to the dashboard.
fn signed_in(token: &str, config: &AppConfig) -> Response {
    (
        AppendHeaders([(header::SET_COOKIE, auth::session_cookie(token, config))]),
        Redirect::to("/dashboard"),
    )
        .into_response()
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /
pub async fn index(user: Result<AuthUser, ApiErr>) -> Redirect {
    match user {
        Ok(_) => Redirect::to("/dashboard"),
        Err(_) => Redirect::to("/login"),
    }
}

/// GET /login
pub async fn login_page() -> Html<String> {
    login_form(None, "")
}

/// POST /login
pub async fn login_submit(
    State(store): State<Store>,
    State(config): State<AppConfig>,
    Form(req): Form<LoginRequest>,
) -> Response {
    match auth::login_user(&store, &config, &req) {
        Ok(auth) => signed_in(&auth.access_token, &config),
        Err(e) => (e.status(), login_form(Some(e.message()), &req.username)).into_response(),
    }
}

/// GET /signup
pub async fn signup_page() -> Html<String> {
    signup_form(None, None)
}

/// POST /signup
pub async fn signup_submit(
    State(store): State<Store>,
    State(config): State<AppConfig>,
    Form(req): Form<SignupRequest>,
) -> Response {
    match auth::signup_user(&store, &config, &req) {
        Ok(auth) => {
            tracing::info!(user_id = %auth.user.id, "signup");
            signed_in(&auth.access_token, &config)
        }
        Err(e) => (e.status(), signup_form(Some(e.message()), Some(&req))).into_response(),
    }
}

/// GET /dashboard: the signed-in user's company and its projects.
pub async fn dashboard(
    State(store): State<Store>,
    user: Result<AuthUser, ApiErr>,
) -> Result<Response, ApiErr> {
    let Ok(AuthUser { user }) = user else {
        return Ok(Redirect::to("/login").into_response());
    };

    let mut body = format!(
        "<h1>Welcome, {}</h1><p>{} · {}</p>",
        escape(&user.full_name()),
        escape(&user.username),
        user.role
    );

    match user.company_id.as_deref() {
        None => body.push_str("<p>You are not part of a company yet.</p>"),
        Some(company_id) => {
            let company = store.get_company(company_id)?;
            let projects = store.list_company_projects(company_id)?;
            let _ = write!(body, "<h2>{}</h2>", escape(&company.name));
            if projects.is_empty() {
                body.push_str("<p>No projects yet.</p>");
            } else {
                body.push_str(
                    "<table><tr><th>Project</th><th>Status</th><th>Location</th>\
<th>Members</th><th>Open tasks</th></tr>",
                );
                for project in &projects {
                    let open = store.count_open_tasks(&project.id)?;
                    let _ = write!(
                        body,
                        "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{open}</td></tr>",
                        escape(&project.name),
                        project.status,
                        escape(project.location.as_deref().unwrap_or("")),
                        project.members.len(),
                    );
                }
                body.push_str("</table>");
            }
        }
    }

    body.push_str(
        "<form method=\"post\" action=\"/logout\"><button type=\"submit\">Log out</button></form>",
    );
    Ok(layout("Dashboard", &body).into_response())
}

/// POST /logout
pub async fn logout(State(config): State<AppConfig>) -> impl IntoResponse {
    (
        AppendHeaders([(header::SET_COOKIE, auth::clear_session_cookie(&config))]),
        Redirect::to("/login"),
    )
}
