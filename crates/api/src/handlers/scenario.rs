//! Handlers for the `/scenarios` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use ports_core::error::CoreError;
use ports_core::owner::TaskOwner;
use ports_db::models::scenario::{CreateScenario, DuplicateScenario, Scenario};
use ports_db::models::task::Task;
use ports_db::repositories::{ScenarioRepo, TaskRepo};
use uuid::Uuid;

use crate::engine::teardown;
use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Load a scenario or fail with 404.
pub(crate) async fn ensure_scenario(state: &AppState, id: Uuid) -> AppResult<Scenario> {
    ScenarioRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Scenario", id)))
}

/// POST /api/v1/scenarios
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateScenario>,
) -> AppResult<(StatusCode, Json<DataResponse<Scenario>>)> {
    if let Some(id) = input.id {
        if ScenarioRepo::find_by_id(&state.pool, id).await?.is_some() {
            return Err(AppError::Core(CoreError::Conflict(format!(
                "Scenario {id} already exists"
            ))));
        }
    }
    let scenario = ScenarioRepo::create(&state.pool, &input).await?;
    tracing::info!(scenario_id = %scenario.id, "Created scenario");
    Ok((StatusCode::CREATED, Json(DataResponse { data: scenario })))
}

/// GET /api/v1/scenarios
pub async fn list(State(state): State<AppState>) -> AppResult<Json<DataResponse<Vec<Scenario>>>> {
    let scenarios = ScenarioRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: scenarios }))
}

/// GET /api/v1/scenarios/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<DataResponse<Scenario>>> {
    let scenario = ensure_scenario(&state, id).await?;
    Ok(Json(DataResponse { data: scenario }))
}

/// DELETE /api/v1/scenarios/{id}
///
/// Tears the scenario down: items, attached tasks and their result folders.
pub async fn delete(State(state): State<AppState>, Path(id): Path<Uuid>) -> AppResult<StatusCode> {
    match teardown::delete_scenario(&state.pool, &state.config.upload_path, id).await? {
        Some(_) => Ok(StatusCode::NO_CONTENT),
        None => Err(AppError::Core(CoreError::not_found("Scenario", id))),
    }
}

/// POST /api/v1/scenarios/{id}/duplicate
pub async fn duplicate(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<DuplicateScenario>,
) -> AppResult<(StatusCode, Json<DataResponse<Scenario>>)> {
    if let Some(target) = input.id {
        if ScenarioRepo::find_by_id(&state.pool, target).await?.is_some() {
            return Err(AppError::Core(CoreError::Conflict(format!(
                "Scenario {target} already exists"
            ))));
        }
    }
    let copy = ScenarioRepo::duplicate(&state.pool, id, &input)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Scenario", id)))?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: copy })))
}

/// GET /api/v1/scenarios/{id}/tasks
pub async fn list_tasks(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<DataResponse<Vec<Task>>>> {
    ensure_scenario(&state, id).await?;
    let tasks = TaskRepo::list_by_owner(&state.pool, &TaskOwner::Scenario(id)).await?;
    Ok(Json(DataResponse { data: tasks }))
}
