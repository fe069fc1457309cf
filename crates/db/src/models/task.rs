//! Task entity model and DTOs.

use ports_core::error::CoreError;
use ports_core::owner::TaskOwner;
use ports_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A row from the `tasks` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Task {
    pub id: DbId,
    pub parent_task_id: Option<DbId>,
    pub task_type: String,
    pub owner_kind: String,
    pub owner_id: Uuid,
    pub created_at: Timestamp,
}

impl Task {
    /// Resolve the stored `(owner_kind, owner_id)` pair.
    pub fn owner(&self) -> Result<TaskOwner, CoreError> {
        TaskOwner::from_parts(&self.owner_kind, self.owner_id)
    }
}

/// DTO for creating a task via `POST /api/v1/tasks`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTask {
    pub parent_task_id: Option<DbId>,
    pub task_type: String,
    pub owner: TaskOwner,
}
