use axum::{
    Json,
    extract::{Path, State},
};

use sitework_api::{ListUsersResponse, OkResponse, UpdateUserRequest, service};
use sitework_core::{Action, User};
use sitework_store::Store;

use crate::error::{ApiErr, ApiJson};
use crate::routes::auth::AuthUser;

/// True when `requester` owns the company `target` belongs to.
fn owns_company_of(store: &Store, requester: &AuthUser, target: &User) -> Result<bool, ApiErr> {
    let Some(company_id) = target.company_id.as_deref() else {
        return Ok(false);
    };
    if requester.require_company(company_id).is_err()
        || requester.require(Action::ManageCompany).is_err()
    {
        return Ok(false);
    }
    Ok(store.get_company(company_id)?.owner_id == requester.id())
}

/// GET /api/users: members of the requester's company.
pub async fn list_users(
    State(store): State<Store>,
    user: AuthUser,
) -> Result<Json<ListUsersResponse>, ApiErr> {
    let users = match user.user.company_id.clone() {
        Some(company_id) => store.list_company_users(&company_id)?,
        None => vec![user.user],
    };
    Ok(Json(ListUsersResponse { users }))
}

/// GET /api/users/{id}: yourself or a colleague.
pub async fn get_user(
    State(store): State<Store>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<User>, ApiErr> {
    if id == user.id() {
        return Ok(Json(user.user));
    }
    let target = store.get_user(&id)?;
    match target.company_id.as_deref() {
        Some(company_id) => user.require_company(company_id)?,
        None => return Err(ApiErr::forbidden("user is not in your company")),
    }
    Ok(Json(target))
}

/// PUT /api/users/{id}: profile fields for yourself; the company owner may
/// also edit members and change their role.
pub async fn update_user(
    State(store): State<Store>,
    user: AuthUser,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<UpdateUserRequest>,
) -> Result<Json<User>, ApiErr> {
    let target = store.get_user(&id)?;
    let is_self = target.id == user.id();
    let is_owner = owns_company_of(&store, &user, &target)?;
    if !is_self && !is_owner {
        return Err(ApiErr::forbidden("cannot edit another user's profile"));
    }

    let patch = service::user_patch(&req)?;
    if patch.role.is_some_and(|r| r != target.role) && (!is_owner || is_self) {
        return Err(ApiErr::forbidden(
            "only the company owner can change a member's role",
        ));
    }
    Ok(Json(store.update_user(&id, patch)?))
}

/// DELETE /api/users/{id}: delete your own account, or (owner) a member's.
pub async fn delete_user(
    State(store): State<Store>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<OkResponse>, ApiErr> {
    let target = store.get_user(&id)?;
    if target.id != user.id() && !owns_company_of(&store, &user, &target)? {
        return Err(ApiErr::forbidden("cannot delete another user"));
    }
    store.delete_user(&id)?;
    Ok(Json(OkResponse { ok: true }))
}
