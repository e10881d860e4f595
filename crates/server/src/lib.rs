//! Sitework HTTP server: JSON API under `/api` plus a few server-rendered pages.

pub mod config;
pub mod error;
pub mod routes;

use axum::{
    Router,
    extract::FromRef,
    routing::{delete, get, post, put},
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use config::AppConfig;
use sitework_store::Store;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    pub config: AppConfig,
}

impl FromRef<AppState> for Store {
    fn from_ref(state: &AppState) -> Self {
        state.store.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

/// Build the full application router.
pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        // Health
        .route("/health", get(routes::health::health))
        // Auth
        .route("/auth/signup", post(routes::auth::signup))
        .route("/auth/login", post(routes::auth::login))
        .route("/auth/logout", post(routes::auth::logout))
        .route("/auth/me", get(routes::auth::me))
        .route("/auth/password", put(routes::auth::change_password))
        // Users
        .route("/users", get(routes::users::list_users))
        .route(
            "/users/{id}",
            get(routes::users::get_user)
                .put(routes::users::update_user)
                .delete(routes::users::delete_user),
        )
        // Companies
        .route("/companies", post(routes::companies::create_company))
        .route(
            "/companies/{id}",
            get(routes::companies::get_company)
                .put(routes::companies::update_company)
                .delete(routes::companies::delete_company),
        )
        .route(
            "/companies/{id}/members",
            get(routes::companies::list_members).post(routes::companies::add_member),
        )
        .route(
            "/companies/{id}/members/{user_id}",
            delete(routes::companies::remove_member),
        )
        .route(
            "/companies/{id}/projects",
            get(routes::companies::list_projects),
        )
        // Projects
        .route(
            "/projects",
            get(routes::projects::list_projects).post(routes::projects::create_project),
        )
        .route(
            "/projects/{id}",
            get(routes::projects::get_project)
                .put(routes::projects::update_project)
                .delete(routes::projects::delete_project),
        )
        .route("/projects/{id}/members", post(routes::projects::add_member))
        .route(
            "/projects/{id}/members/{user_id}",
            delete(routes::projects::remove_member),
        )
        .route("/projects/{id}/tasks", get(routes::projects::list_tasks))
        .route(
            "/projects/{id}/blueprints",
            get(routes::projects::list_blueprints),
        )
        .route("/projects/{id}/reports", get(routes::projects::list_reports))
        // Tasks
        .route("/tasks", post(routes::tasks::create_task))
        .route(
            "/tasks/{id}",
            get(routes::tasks::get_task)
                .put(routes::tasks::update_task)
                .delete(routes::tasks::delete_task),
        )
        // Blueprints
        .route("/blueprints", post(routes::blueprints::create_blueprint))
        .route(
            "/blueprints/{id}",
            get(routes::blueprints::get_blueprint)
                .put(routes::blueprints::update_blueprint)
                .delete(routes::blueprints::delete_blueprint),
        )
        // Reports + embedded issues
        .route("/reports", post(routes::reports::create_report))
        .route(
            "/reports/{id}",
            get(routes::reports::get_report)
                .put(routes::reports::update_report)
                .delete(routes::reports::delete_report),
        )
        .route("/reports/{id}/issues", post(routes::reports::add_issue))
        .route(
            "/reports/{id}/issues/{issue_id}",
            put(routes::reports::update_issue).delete(routes::reports::remove_issue),
        );

    Router::new()
        .nest("/api", api)
        .route("/", get(routes::pages::index))
        .route(
            "/login",
            get(routes::pages::login_page).post(routes::pages::login_submit),
        )
        .route(
            "/signup",
            get(routes::pages::signup_page).post(routes::pages::signup_submit),
        )
        .route("/dashboard", get(routes::pages::dashboard))
        .route("/logout", post(routes::pages::logout))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
