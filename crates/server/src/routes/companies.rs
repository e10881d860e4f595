use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use sitework_api::{
    AddCompanyMemberRequest, CompanyDetailResponse, CreateCompanyRequest, ListProjectsResponse,
    ListUsersResponse, OkResponse, UpdateCompanyRequest, service,
};
use sitework_core::{Action, Company, User, validate};
use sitework_store::Store;

use crate::error::{ApiErr, ApiJson};
use crate::routes::auth::AuthUser;

/// The requester must own the company. Members get 403, outsiders too.
fn owned_company(store: &Store, user: &AuthUser, id: &str) -> Result<(), ApiErr> {
    user.require(Action::ManageCompany)?;
    user.require_owner(store, id)
}

// ---------------------------------------------------------------------------
// Company CRUD
// ---------------------------------------------------------------------------

/// POST /api/companies: an Owner without a company founds one.
pub async fn create_company(
    State(store): State<Store>,
    user: AuthUser,
    ApiJson(req): ApiJson<CreateCompanyRequest>,
) -> Result<(StatusCode, Json<Company>), ApiErr> {
    user.require(Action::ManageCompany)?;
    let input = service::company_input(&req, user.id())?;
    let company = store.create_company(&input)?;
    Ok((StatusCode::CREATED, Json(company)))
}

/// GET /api/companies/{id}: company detail with member and project counts.
pub async fn get_company(
    State(store): State<Store>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<CompanyDetailResponse>, ApiErr> {
    let summary = store.company_summary(&id)?;
    user.require_company(&summary.company.id)?;
    Ok(Json(CompanyDetailResponse {
        company: summary.company,
        member_count: summary.member_count as i64,
        project_count: summary.project_count as i64,
    }))
}

/// PUT /api/companies/{id}: owner only.
pub async fn update_company(
    State(store): State<Store>,
    user: AuthUser,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<UpdateCompanyRequest>,
) -> Result<Json<Company>, ApiErr> {
    owned_company(&store, &user, &id)?;
    let patch = service::company_patch(&req)?;
    Ok(Json(store.update_company(&id, patch)?))
}

/// DELETE /api/companies/{id}: owner only. Removes every project and user
/// of the company, the owner's own account included.
pub async fn delete_company(
    State(store): State<Store>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<OkResponse>, ApiErr> {
    owned_company(&store, &user, &id)?;
    store.delete_company(&id)?;
    Ok(Json(OkResponse { ok: true }))
}

// ---------------------------------------------------------------------------
// Members
// ---------------------------------------------------------------------------

/// GET /api/companies/{id}/members
pub async fn list_members(
    State(store): State<Store>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ListUsersResponse>, ApiErr> {
    user.require_company(&id)?;
    let users = store.list_company_users(&id)?;
    Ok(Json(ListUsersResponse { users }))
}

/// POST /api/companies/{id}/members: add an unaffiliated user by username.
pub async fn add_member(
    State(store): State<Store>,
    user: AuthUser,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<AddCompanyMemberRequest>,
) -> Result<(StatusCode, Json<User>), ApiErr> {
    owned_company(&store, &user, &id)?;
    let username = validate::validate_username(&req.username)?;
    let member = store.add_company_member(&id, &username)?;
    tracing::info!(company_id = %id, user_id = %member.id, "added company member");
    Ok((StatusCode::CREATED, Json(member)))
}

/// DELETE /api/companies/{id}/members/{user_id}
pub async fn remove_member(
    State(store): State<Store>,
    user: AuthUser,
    Path((id, user_id)): Path<(String, String)>,
) -> Result<Json<OkResponse>, ApiErr> {
    owned_company(&store, &user, &id)?;
    store.remove_company_member(&id, &user_id)?;
    Ok(Json(OkResponse { ok: true }))
}

/// GET /api/companies/{id}/projects
pub async fn list_projects(
    State(store): State<Store>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ListProjectsResponse>, ApiErr> {
    user.require_company(&id)?;
    let projects = store.list_company_projects(&id)?;
    Ok(Json(ListProjectsResponse { projects }))
}
