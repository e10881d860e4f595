use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use sitework_api::{
    CreateProjectRequest, ListBlueprintsResponse, ListProjectsResponse, ListReportsResponse,
    ListTasksResponse, OkResponse, ProjectMemberRequest, UpdateProjectRequest, service,
};
use sitework_core::{Action, Project};
use sitework_store::Store;

use crate::error::{ApiErr, ApiJson};
use crate::routes::auth::AuthUser;

/// Load a project, refusing projects of other companies.
fn company_project(store: &Store, user: &AuthUser, id: &str) -> Result<Project, ApiErr> {
    let project = store.get_project(id)?;
    user.require_company(&project.company_id)?;
    Ok(project)
}

// ---------------------------------------------------------------------------
// Project CRUD
// ---------------------------------------------------------------------------

/// GET /api/projects: projects of the requester's company.
pub async fn list_projects(
    State(store): State<Store>,
    user: AuthUser,
) -> Result<Json<ListProjectsResponse>, ApiErr> {
    let projects = match user.user.company_id.as_deref() {
        Some(company_id) => store.list_company_projects(company_id)?,
        None => Vec::new(),
    };
    Ok(Json(ListProjectsResponse { projects }))
}

/// POST /api/projects
pub async fn create_project(
    State(store): State<Store>,
    user: AuthUser,
    ApiJson(req): ApiJson<CreateProjectRequest>,
) -> Result<(StatusCode, Json<Project>), ApiErr> {
    user.require(Action::CreateProject)?;
    let company_id = match req.company_id.as_deref() {
        Some(id) => id.trim().to_string(),
        None => user.company_id()?.to_string(),
    };
    user.require_owner(&store, &company_id)?;

    let input = service::project_input(&req, &company_id)?;
    let project = store.create_project(&input)?;
    tracing::info!(project_id = %project.id, company_id = %company_id, "project created");
    Ok((StatusCode::CREATED, Json(project)))
}

/// GET /api/projects/{id}
pub async fn get_project(
    State(store): State<Store>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Project>, ApiErr> {
    Ok(Json(company_project(&store, &user, &id)?))
}

/// PUT /api/projects/{id}
pub async fn update_project(
    State(store): State<Store>,
    user: AuthUser,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<UpdateProjectRequest>,
) -> Result<Json<Project>, ApiErr> {
    company_project(&store, &user, &id)?;
    user.require(Action::EditProject)?;
    let patch = service::project_patch(&req)?;
    Ok(Json(store.update_project(&id, patch)?))
}

/// DELETE /api/projects/{id}: cascades to tasks, blueprints and reports.
pub async fn delete_project(
    State(store): State<Store>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<OkResponse>, ApiErr> {
    let project = company_project(&store, &user, &id)?;
    user.require(Action::DeleteProject)?;
    user.require_owner(&store, &project.company_id)?;
    store.delete_project(&id)?;
    Ok(Json(OkResponse { ok: true }))
}

// ---------------------------------------------------------------------------
// Members
// ---------------------------------------------------------------------------

/// POST /api/projects/{id}/members
pub async fn add_member(
    State(store): State<Store>,
    user: AuthUser,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<ProjectMemberRequest>,
) -> Result<Json<Project>, ApiErr> {
    company_project(&store, &user, &id)?;
    user.require(Action::EditProject)?;
    let user_id = req.user_id.trim();
    if user_id.is_empty() {
        return Err(ApiErr::bad_request("user_id is required"));
    }
    Ok(Json(store.add_project_member(&id, user_id)?))
}

/// DELETE /api/projects/{id}/members/{user_id}
pub async fn remove_member(
    State(store): State<Store>,
    user: AuthUser,
    Path((id, user_id)): Path<(String, String)>,
) -> Result<Json<Project>, ApiErr> {
    company_project(&store, &user, &id)?;
    user.require(Action::EditProject)?;
    Ok(Json(store.remove_project_member(&id, &user_id)?))
}

// ---------------------------------------------------------------------------
// Children
// ---------------------------------------------------------------------------

/// GET /api/projects/{id}/tasks
pub async fn list_tasks(
    State(store): State<Store>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ListTasksResponse>, ApiErr> {
    user.require_project(&store, &id)?;
    let tasks = store.list_project_tasks(&id)?;
    Ok(Json(ListTasksResponse { tasks }))
}

/// GET /api/projects/{id}/blueprints
pub async fn list_blueprints(
    State(store): State<Store>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ListBlueprintsResponse>, ApiErr> {
    user.require_project(&store, &id)?;
    let blueprints = store.list_project_blueprints(&id)?;
    Ok(Json(ListBlueprintsResponse { blueprints }))
}

/// GET /api/projects/{id}/reports
pub async fn list_reports(
    State(store): State<Store>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ListReportsResponse>, ApiErr> {
    user.require_project(&store, &id)?;
    let reports = store.list_project_reports(&id)?;
    Ok(Json(ListReportsResponse { reports }))
}
