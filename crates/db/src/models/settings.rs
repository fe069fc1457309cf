//! Settings entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A row from the `settings` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Settings {
    pub id: Uuid,
    pub internal_id: i32,
    pub scenario_id: Uuid,
    pub settings: serde_json::Value,
}

/// DTO for creating a settings object.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSettings {
    /// Pre-computed id; must equal the derived one when given.
    pub id: Option<Uuid>,
    pub internal_id: i32,
    /// Defaults to `{}`.
    pub settings: Option<serde_json::Value>,
}
