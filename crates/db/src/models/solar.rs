//! Solar asset entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A row from the `solar` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Solar {
    pub id: Uuid,
    pub internal_id: i32,
    pub scenario_id: Uuid,
    pub area_id: Uuid,
}

/// DTO for creating a solar asset.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSolar {
    /// Pre-computed id; must equal the derived one when given.
    pub id: Option<Uuid>,
    pub internal_id: i32,
    /// Area of the same scenario the asset is placed on.
    pub area_id: Uuid,
}
