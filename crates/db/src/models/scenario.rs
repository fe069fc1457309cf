//! Scenario entity model and DTOs.

use ports_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A row from the `scenarios` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Scenario {
    pub id: Uuid,
    pub name: Option<String>,
    pub created_at: Timestamp,
    pub manager_id: Option<DbId>,
}

/// DTO for creating a scenario.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateScenario {
    /// Client-generated id. A random v4 UUID is used when omitted.
    pub id: Option<Uuid>,
    pub name: Option<String>,
    pub manager_id: Option<DbId>,
}

/// DTO for `POST /api/v1/scenarios/{id}/duplicate`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DuplicateScenario {
    /// Id of the copy. A random v4 UUID is used when omitted.
    pub id: Option<Uuid>,
    /// Name of the copy. Defaults to the source name.
    pub name: Option<String>,
}
