//! Handlers for the `/tasks` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use ports_core::error::CoreError;
use ports_core::task::validate_task_type;
use ports_core::types::DbId;
use ports_db::models::progress::Progress;
use ports_db::models::task::{CreateTask, Task};
use ports_db::repositories::{OwnerRepo, ProgressRepo, TaskRepo};

use super::progress::ProgressView;
use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

async fn ensure_task(state: &AppState, id: DbId) -> AppResult<Task> {
    TaskRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Task", id)))
}

/// POST /api/v1/tasks
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateTask>,
) -> AppResult<(StatusCode, Json<DataResponse<Task>>)> {
    validate_task_type(&input.task_type)?;

    if !OwnerRepo::exists(&state.pool, &input.owner).await? {
        return Err(AppError::Core(CoreError::not_found(
            input.owner.kind().as_str(),
            input.owner.id(),
        )));
    }
    if let Some(parent_id) = input.parent_task_id {
        ensure_task(&state, parent_id).await?;
    }

    let task = TaskRepo::create(&state.pool, &input).await?;
    tracing::info!(
        task_id = task.id,
        task_type = %task.task_type,
        owner_kind = %task.owner_kind,
        owner_id = %task.owner_id,
        "Created task",
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: task })))
}

/// GET /api/v1/tasks/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Task>>> {
    let task = ensure_task(&state, id).await?;
    Ok(Json(DataResponse { data: task }))
}

/// GET /api/v1/tasks/{id}/children
pub async fn list_children(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Task>>>> {
    ensure_task(&state, id).await?;
    let children = TaskRepo::list_children(&state.pool, id).await?;
    Ok(Json(DataResponse { data: children }))
}

/// GET /api/v1/tasks/{id}/progress
pub async fn list_progress(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<ProgressView>>>> {
    ensure_task(&state, id).await?;
    let records = ProgressRepo::list_by_task(&state.pool, id).await?;
    let now = chrono::Utc::now();
    let views = records
        .into_iter()
        .map(|p| ProgressView::build(p, now))
        .collect::<AppResult<Vec<_>>>()?;
    Ok(Json(DataResponse { data: views }))
}

/// POST /api/v1/tasks/{id}/progress
pub async fn create_progress(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<(StatusCode, Json<DataResponse<Progress>>)> {
    ensure_task(&state, id).await?;
    let progress = ProgressRepo::create(&state.pool, id).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: progress })))
}
