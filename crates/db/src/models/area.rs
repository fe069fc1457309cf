//! Area entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A row from the `areas` table. `geom` is a GeoJSON polygon.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Area {
    pub id: Uuid,
    pub internal_id: i32,
    pub scenario_id: Uuid,
    pub geom: serde_json::Value,
}

/// DTO for creating an area.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateArea {
    /// Pre-computed id; must equal the derived one when given.
    pub id: Option<Uuid>,
    pub internal_id: i32,
    pub geom: serde_json::Value,
}
