//! Repository for the `solar` table.

use ports_core::scenario_id::ItemKey;
use sqlx::PgExecutor;
use uuid::Uuid;

use crate::models::solar::Solar;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, internal_id, scenario_id, area_id";

/// Provides CRUD operations for solar assets.
pub struct SolarRepo;

impl SolarRepo {
    /// Insert a solar asset under a derived key, returning the created row.
    pub async fn create<'e>(
        executor: impl PgExecutor<'e>,
        key: &ItemKey,
        area_id: Uuid,
    ) -> Result<Solar, sqlx::Error> {
        let query = format!(
            "INSERT INTO solar (id, internal_id, scenario_id, area_id)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Solar>(&query)
            .bind(key.id())
            .bind(key.internal_id())
            .bind(key.scenario_id())
            .bind(area_id)
            .fetch_one(executor)
            .await
    }

    /// List the solar assets of a scenario ordered by internal id.
    pub async fn list_by_scenario<'e>(
        executor: impl PgExecutor<'e>,
        scenario_id: Uuid,
    ) -> Result<Vec<Solar>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM solar WHERE scenario_id = $1 ORDER BY internal_id"
        );
        sqlx::query_as::<_, Solar>(&query)
            .bind(scenario_id)
            .fetch_all(executor)
            .await
    }
}
