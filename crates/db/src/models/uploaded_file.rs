//! Uploaded file entity model and DTOs.

use ports_core::error::CoreError;
use ports_core::owner::TaskOwner;
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// A row from the `uploaded_files` table.
///
/// `file_path` is relative to the configured upload root.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UploadedFile {
    pub id: Uuid,
    pub internal_id: i32,
    pub scenario_id: Uuid,
    pub name: Option<String>,
    pub file_path: String,
    pub owner_kind: String,
    pub owner_id: Uuid,
}

impl UploadedFile {
    /// Resolve the stored `(owner_kind, owner_id)` pair.
    pub fn owner(&self) -> Result<TaskOwner, CoreError> {
        TaskOwner::from_parts(&self.owner_kind, self.owner_id)
    }
}

/// Values for a new uploaded file row, assembled from a multipart upload.
#[derive(Debug, Clone)]
pub struct CreateUploadedFile {
    pub name: Option<String>,
    pub file_path: String,
    pub owner: TaskOwner,
}
