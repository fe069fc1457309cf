//! Handlers for the `/progress` resource.
//!
//! Each transition loads the record, applies the change to a
//! [`ProgressState`] and stores the result with `ProgressRepo::save_state`.

use axum::extract::{Path, State};
use axum::Json;
use ports_core::error::CoreError;
use ports_core::progress::{validate_work, ProgressState};
use ports_core::types::{DbId, Timestamp};
use ports_db::models::progress::{AdvanceWork, FailProgress, Progress, UpdateWork};
use ports_db::repositories::ProgressRepo;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// A progress record with its derived figures.
#[derive(Debug, Serialize)]
pub struct ProgressView {
    #[serde(flatten)]
    pub progress: Progress,
    /// Label of `status_id`.
    pub status: &'static str,
    /// Completion percentage (not clamped).
    pub percent: f64,
    /// Estimated remaining minutes, `null` while no rate is known.
    pub eta_minutes: Option<f64>,
}

impl ProgressView {
    pub fn build(progress: Progress, now: Timestamp) -> AppResult<Self> {
        let state = progress.state()?;
        Ok(Self {
            status: state.status.label(),
            percent: state.get_progress(),
            eta_minutes: state.estimate_duration(now),
            progress,
        })
    }
}

type ProgressResponse = AppResult<Json<DataResponse<ProgressView>>>;

async fn load(state: &AppState, id: DbId) -> AppResult<Progress> {
    ProgressRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Progress", id)))
}

/// Load record `id`, apply `transition` and persist the new state.
async fn apply(
    state: &AppState,
    id: DbId,
    transition: impl FnOnce(&mut ProgressState) -> AppResult<()>,
) -> ProgressResponse {
    let mut tracker = load(state, id).await?.state()?;
    transition(&mut tracker)?;

    let saved = ProgressRepo::save_state(&state.pool, id, &tracker)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Progress", id)))?;
    let view = ProgressView::build(saved, chrono::Utc::now())?;
    Ok(Json(DataResponse { data: view }))
}

/// GET /api/v1/progress/{id}
pub async fn get_by_id(State(state): State<AppState>, Path(id): Path<DbId>) -> ProgressResponse {
    let progress = load(&state, id).await?;
    let view = ProgressView::build(progress, chrono::Utc::now())?;
    Ok(Json(DataResponse { data: view }))
}

/// PUT /api/v1/progress/{id}/work
pub async fn update_work(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateWork>,
) -> ProgressResponse {
    apply(&state, id, |tracker| {
        let total_work = input.total_work.unwrap_or(tracker.total_work);
        validate_work(input.current_work, total_work)?;
        tracker.set_work(input.current_work, total_work);
        Ok(())
    })
    .await
}

/// POST /api/v1/progress/{id}/advance
///
/// Adds `amount` (default 1) finished units to `current_work`.
pub async fn advance(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<AdvanceWork>,
) -> ProgressResponse {
    apply(&state, id, |tracker| {
        if input.amount < 0 {
            return Err(AppError::Core(CoreError::Validation(format!(
                "amount must not be negative, got {}",
                input.amount
            ))));
        }
        tracker.advance(input.amount);
        Ok(())
    })
    .await
}

/// POST /api/v1/progress/{id}/start
pub async fn start(State(state): State<AppState>, Path(id): Path<DbId>) -> ProgressResponse {
    apply(&state, id, |tracker| {
        tracker.start();
        Ok(())
    })
    .await
}

/// POST /api/v1/progress/{id}/success
pub async fn succeed(State(state): State<AppState>, Path(id): Path<DbId>) -> ProgressResponse {
    apply(&state, id, |tracker| {
        tracker.set_success();
        Ok(())
    })
    .await
}

/// POST /api/v1/progress/{id}/failed
pub async fn fail(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<FailProgress>,
) -> ProgressResponse {
    apply(&state, id, |tracker| {
        if let Some(error) = input.error {
            tracker.push_error(error);
        }
        tracker.set_failed();
        Ok(())
    })
    .await
}

/// POST /api/v1/progress/{id}/reset
pub async fn reset(State(state): State<AppState>, Path(id): Path<DbId>) -> ProgressResponse {
    apply(&state, id, |tracker| {
        tracker.reset(chrono::Utc::now());
        Ok(())
    })
    .await
}
