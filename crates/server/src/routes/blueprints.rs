use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use sitework_api::{CreateBlueprintRequest, OkResponse, UpdateBlueprintRequest, service};
use sitework_core::{Action, Blueprint};
use sitework_store::Store;

use crate::error::{ApiErr, ApiJson};
use crate::routes::auth::AuthUser;

fn company_blueprint(store: &Store, user: &AuthUser, id: &str) -> Result<Blueprint, ApiErr> {
    let blueprint = store.get_blueprint(id)?;
    user.require_project(store, &blueprint.project_id)?;
    Ok(blueprint)
}

/// POST /api/blueprints: the requester is recorded as uploader.
pub async fn create_blueprint(
    State(store): State<Store>,
    user: AuthUser,
    ApiJson(req): ApiJson<CreateBlueprintRequest>,
) -> Result<(StatusCode, Json<Blueprint>), ApiErr> {
    user.require(Action::UploadBlueprint)?;
    let input = service::blueprint_input(&req, user.id())?;
    user.require_project(&store, &input.project_id)?;
    let blueprint = store.create_blueprint(&input)?;
    Ok((StatusCode::CREATED, Json(blueprint)))
}

/// GET /api/blueprints/{id}
pub async fn get_blueprint(
    State(store): State<Store>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Blueprint>, ApiErr> {
    Ok(Json(company_blueprint(&store, &user, &id)?))
}

/// PUT /api/blueprints/{id}
pub async fn update_blueprint(
    State(store): State<Store>,
    user: AuthUser,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<UpdateBlueprintRequest>,
) -> Result<Json<Blueprint>, ApiErr> {
    company_blueprint(&store, &user, &id)?;
    user.require(Action::UploadBlueprint)?;
    let patch = service::blueprint_patch(&req)?;
    Ok(Json(store.update_blueprint(&id, patch)?))
}

/// DELETE /api/blueprints/{id}
pub async fn delete_blueprint(
    State(store): State<Store>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<OkResponse>, ApiErr> {
    company_blueprint(&store, &user, &id)?;
    user.require(Action::DeleteBlueprint)?;
    store.delete_blueprint(&id)?;
    Ok(Json(OkResponse { ok: true }))
}
