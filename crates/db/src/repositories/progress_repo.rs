//! Repository for the `progress` table.
//!
//! State transitions happen on [`ProgressState`] values in `ports_core`;
//! this repository only loads and stores them.

use ports_core::progress::{ProgressState, ProgressStatus};
use ports_core::types::DbId;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::progress::Progress;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "\
    id, task_id, created_at, status_id, total_work, current_work, \
    success, running, errors";

/// Provides CRUD operations for progress records.
pub struct ProgressRepo;

impl ProgressRepo {
    /// Insert a new record for `task_id` in the `Waiting` state.
    pub async fn create(pool: &PgPool, task_id: DbId) -> Result<Progress, sqlx::Error> {
        let query = format!(
            "INSERT INTO progress (task_id, status_id)
             VALUES ($1, $2)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Progress>(&query)
            .bind(task_id)
            .bind(ProgressStatus::Waiting.id())
            .fetch_one(pool)
            .await
    }

    /// Find a progress record by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Progress>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM progress WHERE id = $1");
        sqlx::query_as::<_, Progress>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List the progress records of a task, oldest first.
    pub async fn list_by_task(pool: &PgPool, task_id: DbId) -> Result<Vec<Progress>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM progress WHERE task_id = $1 ORDER BY created_at, id"
        );
        sqlx::query_as::<_, Progress>(&query)
            .bind(task_id)
            .fetch_all(pool)
            .await
    }

    /// Persist a state produced by a transition.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn save_state(
        pool: &PgPool,
        id: DbId,
        state: &ProgressState,
    ) -> Result<Option<Progress>, sqlx::Error> {
        let query = format!(
            "UPDATE progress SET
                created_at = $2,
                status_id = $3,
                total_work = $4,
                current_work = $5,
                success = $6,
                running = $7,
                errors = $8
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let progress = sqlx::query_as::<_, Progress>(&query)
            .bind(id)
            .bind(state.created_at)
            .bind(state.status.id())
            .bind(state.total_work)
            .bind(state.current_work)
            .bind(state.success)
            .bind(state.running)
            .bind(Json(&state.errors))
            .fetch_optional(pool)
            .await?;

        if progress.is_some() {
            tracing::debug!(
                progress_id = id,
                status = state.status.label(),
                current_work = state.current_work,
                total_work = state.total_work,
                "Saved progress state",
            );
        }
        Ok(progress)
    }
}
