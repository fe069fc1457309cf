//! Progress entity model and DTOs.

use ports_core::error::CoreError;
use ports_core::progress::{ProgressState, ProgressStatus, StatusId};
use ports_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

/// A row from the `progress` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Progress {
    pub id: DbId,
    pub task_id: DbId,
    pub created_at: Timestamp,
    pub status_id: StatusId,
    pub total_work: i32,
    pub current_work: i32,
    pub success: bool,
    pub running: bool,
    pub errors: Json<Vec<serde_json::Value>>,
}

impl Progress {
    /// Snapshot the row as a [`ProgressState`] for transitions.
    pub fn state(&self) -> Result<ProgressState, CoreError> {
        Ok(ProgressState {
            status: ProgressStatus::from_id(self.status_id)?,
            created_at: self.created_at,
            total_work: self.total_work,
            current_work: self.current_work,
            success: self.success,
            running: self.running,
            errors: self.errors.0.clone(),
        })
    }
}

/// DTO for `PUT /api/v1/progress/{id}/work`.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateWork {
    pub current_work: i32,
    /// Keeps the stored total when omitted.
    pub total_work: Option<i32>,
}

/// DTO for `POST /api/v1/progress/{id}/advance`.
#[derive(Debug, Clone, Deserialize)]
pub struct AdvanceWork {
    #[serde(default = "one_unit")]
    pub amount: i32,
}

fn one_unit() -> i32 {
    1
}

/// DTO for `POST /api/v1/progress/{id}/failed`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FailProgress {
    /// Entry appended to the error list before failing.
    pub error: Option<serde_json::Value>,
}
