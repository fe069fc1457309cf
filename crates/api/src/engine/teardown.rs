//! Scenario teardown.
//!
//! Deleting a scenario removes its row, every item row, every task attached
//! to the scenario or one of its items (with descendants and progress
//! records) and the result folders of those tasks.

use std::path::Path;

use ports_core::storage::remove_results_folder;
use ports_core::types::DbId;
use ports_db::repositories::ScenarioRepo;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::AppError;

/// Errors raised while tearing a scenario down.
#[derive(Debug, thiserror::Error)]
pub enum TeardownError {
    #[error(transparent)]
    Database(#[from] sqlx::Error),

    /// The rows are gone but a result folder could not be removed.
    #[error("Failed to remove results folder of task {task_id}: {source}")]
    Storage {
        task_id: DbId,
        #[source]
        source: std::io::Error,
    },
}

impl From<TeardownError> for AppError {
    fn from(err: TeardownError) -> Self {
        match err {
            TeardownError::Database(e) => AppError::Database(e),
            storage @ TeardownError::Storage { .. } => AppError::InternalError(storage.to_string()),
        }
    }
}

/// Delete scenario `scenario_id` and everything attached to it.
///
/// Rows are removed in one transaction. Result folders under `upload_root`
/// are removed after the commit; a missing folder is skipped. Returns the ids
/// of the removed tasks, or `None` if the scenario does not exist.
pub async fn delete_scenario(
    pool: &PgPool,
    upload_root: &Path,
    scenario_id: Uuid,
) -> Result<Option<Vec<DbId>>, TeardownError> {
    let Some(task_ids) = ScenarioRepo::delete_with_tasks(pool, scenario_id).await? else {
        return Ok(None);
    };

    for &task_id in &task_ids {
        remove_results_folder(upload_root, task_id)
            .await
            .map_err(|source| TeardownError::Storage { task_id, source })?;
    }

    tracing::info!(
        scenario_id = %scenario_id,
        tasks = task_ids.len(),
        "Scenario torn down",
    );
    Ok(Some(task_ids))
}
