//! Repository for the `settings` table.

use ports_core::scenario_id::ItemKey;
use sqlx::PgExecutor;
use uuid::Uuid;

use crate::models::settings::Settings;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, internal_id, scenario_id, settings";

/// Provides CRUD operations for scenario settings.
pub struct SettingsRepo;

impl SettingsRepo {
    /// Insert a settings object under a derived key, returning the created row.
    pub async fn create<'e>(
        executor: impl PgExecutor<'e>,
        key: &ItemKey,
        settings: &serde_json::Value,
    ) -> Result<Settings, sqlx::Error> {
        let query = format!(
            "INSERT INTO settings (id, internal_id, scenario_id, settings)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Settings>(&query)
            .bind(key.id())
            .bind(key.internal_id())
            .bind(key.scenario_id())
            .bind(settings)
            .fetch_one(executor)
            .await
    }

    /// List the settings of a scenario ordered by internal id.
    pub async fn list_by_scenario<'e>(
        executor: impl PgExecutor<'e>,
        scenario_id: Uuid,
    ) -> Result<Vec<Settings>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM settings WHERE scenario_id = $1 ORDER BY internal_id"
        );
        sqlx::query_as::<_, Settings>(&query)
            .bind(scenario_id)
            .fetch_all(executor)
            .await
    }
}
