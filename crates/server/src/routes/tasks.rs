use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use sitework_api::{CreateTaskRequest, OkResponse, UpdateTaskRequest, service};
use sitework_core::{Action, Task};
use sitework_store::Store;

use crate::error::{ApiErr, ApiJson};
use crate::routes::auth::AuthUser;

fn company_task(store: &Store, user: &AuthUser, id: &str) -> Result<Task, ApiErr> {
    let task = store.get_task(id)?;
    user.require_project(store, &task.project_id)?;
    Ok(task)
}

/// POST /api/tasks
pub async fn create_task(
    State(store): State<Store>,
    user: AuthUser,
    ApiJson(req): ApiJson<CreateTaskRequest>,
) -> Result<(StatusCode, Json<Task>), ApiErr> {
    user.require(Action::ManageTasks)?;
    let input = service::task_input(&req)?;
    user.require_project(&store, &input.project_id)?;
    let task = store.create_task(&input)?;
    Ok((StatusCode::CREATED, Json(task)))
}

/// GET /api/tasks/{id}
pub async fn get_task(
    State(store): State<Store>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Task>, ApiErr> {
    Ok(Json(company_task(&store, &user, &id)?))
}

/// PUT /api/tasks/{id}: every role may move a task along.
pub async fn update_task(
    State(store): State<Store>,
    user: AuthUser,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<UpdateTaskRequest>,
) -> Result<Json<Task>, ApiErr> {
    company_task(&store, &user, &id)?;
    user.require(Action::UpdateTask)?;
    let patch = service::task_patch(&req)?;
    Ok(Json(store.update_task(&id, patch)?))
}

/// DELETE /api/tasks/{id}
pub async fn delete_task(
    State(store): State<Store>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<OkResponse>, ApiErr> {
    company_task(&store, &user, &id)?;
    user.require(Action::ManageTasks)?;
    store.delete_task(&id)?;
    Ok(Json(OkResponse { ok: true }))
}
