//! Repository for the `areas` table.

use ports_core::scenario_id::ItemKey;
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use crate::models::area::Area;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, internal_id, scenario_id, geom";

/// Provides CRUD operations for areas.
pub struct AreaRepo;

impl AreaRepo {
    /// Insert an area under a derived key, returning the created row.
    pub async fn create<'e>(
        executor: impl PgExecutor<'e>,
        key: &ItemKey,
        geom: &serde_json::Value,
    ) -> Result<Area, sqlx::Error> {
        let query = format!(
            "INSERT INTO areas (id, internal_id, scenario_id, geom)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Area>(&query)
            .bind(key.id())
            .bind(key.internal_id())
            .bind(key.scenario_id())
            .bind(geom)
            .fetch_one(executor)
            .await
    }

    /// Find an area by its ID.
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Area>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM areas WHERE id = $1");
        sqlx::query_as::<_, Area>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List the areas of a scenario ordered by internal id.
    pub async fn list_by_scenario<'e>(
        executor: impl PgExecutor<'e>,
        scenario_id: Uuid,
    ) -> Result<Vec<Area>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM areas WHERE scenario_id = $1 ORDER BY internal_id"
        );
        sqlx::query_as::<_, Area>(&query)
            .bind(scenario_id)
            .fetch_all(executor)
            .await
    }
}
