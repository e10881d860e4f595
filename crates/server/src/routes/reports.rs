use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use sitework_api::{
    CreateIssueRequest, CreateReportRequest, OkResponse, UpdateIssueRequest, UpdateReportRequest,
    service,
};
use sitework_core::{Action, Issue, Report};
use sitework_store::Store;

use crate::error::{ApiErr, ApiJson};
use crate::routes::auth::AuthUser;

fn company_report(store: &Store, user: &AuthUser, id: &str) -> Result<Report, ApiErr> {
    let report = store.get_report(id)?;
    user.require_project(store, &report.project_id)?;
    Ok(report)
}

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

/// POST /api/reports: filed under the requester's name, optionally with
/// initial issues.
pub async fn create_report(
    State(store): State<Store>,
    user: AuthUser,
    ApiJson(req): ApiJson<CreateReportRequest>,
) -> Result<(StatusCode, Json<Report>), ApiErr> {
    user.require(Action::FileReport)?;
    let input = service::report_input(&req, user.id())?;
    user.require_project(&store, &input.project_id)?;
    let report = store.create_report(&input)?;
    Ok((StatusCode::CREATED, Json(report)))
}

/// GET /api/reports/{id}
pub async fn get_report(
    State(store): State<Store>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Report>, ApiErr> {
    Ok(Json(company_report(&store, &user, &id)?))
}

/// PUT /api/reports/{id}
pub async fn update_report(
    State(store): State<Store>,
    user: AuthUser,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<UpdateReportRequest>,
) -> Result<Json<Report>, ApiErr> {
    company_report(&store, &user, &id)?;
    user.require(Action::FileReport)?;
    let patch = service::report_patch(&req)?;
    Ok(Json(store.update_report(&id, patch)?))
}

/// DELETE /api/reports/{id}: issues go with it.
pub async fn delete_report(
    State(store): State<Store>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<OkResponse>, ApiErr> {
    company_report(&store, &user, &id)?;
    user.require(Action::DeleteReport)?;
    store.delete_report(&id)?;
    Ok(Json(OkResponse { ok: true }))
}

// ---------------------------------------------------------------------------
// Embedded issues
// ---------------------------------------------------------------------------

/// POST /api/reports/{id}/issues
pub async fn add_issue(
    State(store): State<Store>,
    user: AuthUser,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<CreateIssueRequest>,
) -> Result<(StatusCode, Json<Issue>), ApiErr> {
    company_report(&store, &user, &id)?;
    user.require(Action::FileReport)?;
    let input = service::issue_input(&req)?;
    let issue = store.add_issue(&id, input)?;
    Ok((StatusCode::CREATED, Json(issue)))
}

/// PUT /api/reports/{id}/issues/{issue_id}
pub async fn update_issue(
    State(store): State<Store>,
    user: AuthUser,
    Path((id, issue_id)): Path<(String, String)>,
    ApiJson(req): ApiJson<UpdateIssueRequest>,
) -> Result<Json<Issue>, ApiErr> {
    company_report(&store, &user, &id)?;
    user.require(Action::FileReport)?;
    let patch = service::issue_patch(&req)?;
    Ok(Json(store.update_issue(&id, &issue_id, patch)?))
}

/// DELETE /api/reports/{id}/issues/{issue_id}
pub async fn remove_issue(
    State(store): State<Store>,
    user: AuthUser,
    Path((id, issue_id)): Path<(String, String)>,
) -> Result<Json<OkResponse>, ApiErr> {
    company_report(&store, &user, &id)?;
    user.require(Action::DeleteReport)?;
    store.remove_issue(&id, &issue_id)?;
    Ok(Json(OkResponse { ok: true }))
}
