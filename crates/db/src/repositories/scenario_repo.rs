//! Repository for the `scenarios` table.
//!
//! Besides plain CRUD this covers the two operations spanning every item
//! table: copying a scenario into a new id namespace and deleting a scenario
//! together with the tasks attached to it.

use ports_core::scenario_id::{remap_ids, ItemKey};
use ports_core::types::DbId;
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use super::{AreaRepo, SettingsRepo, SolarRepo, TaskRepo, UploadedFileRepo};
use crate::models::scenario::{CreateScenario, DuplicateScenario, Scenario};
use crate::models::uploaded_file::CreateUploadedFile;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, created_at, manager_id";

/// Provides CRUD operations for scenarios.
pub struct ScenarioRepo;

impl ScenarioRepo {
    /// Insert a new scenario, returning the created row.
    ///
    /// If `id` is `None` in the input, a random v4 UUID is used.
    pub async fn create(pool: &PgPool, input: &CreateScenario) -> Result<Scenario, sqlx::Error> {
        let id = input.id.unwrap_or_else(Uuid::new_v4);
        Self::insert(pool, id, input.name.as_deref(), input.manager_id).await
    }

    async fn insert<'e>(
        executor: impl PgExecutor<'e>,
        id: Uuid,
        name: Option<&str>,
        manager_id: Option<DbId>,
    ) -> Result<Scenario, sqlx::Error> {
        let query = format!(
            "INSERT INTO scenarios (id, name, manager_id)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Scenario>(&query)
            .bind(id)
            .bind(name)
            .bind(manager_id)
            .fetch_one(executor)
            .await
    }

    /// Find a scenario by its ID.
    pub async fn find_by_id<'e>(
        executor: impl PgExecutor<'e>,
        id: Uuid,
    ) -> Result<Option<Scenario>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM scenarios WHERE id = $1");
        sqlx::query_as::<_, Scenario>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// List all scenarios ordered by most recently created first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Scenario>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM scenarios ORDER BY created_at DESC, id");
        sqlx::query_as::<_, Scenario>(&query).fetch_all(pool).await
    }

    /// Delete a scenario, its items and every task attached to it, in one
    /// transaction.
    ///
    /// Returns the ids of the deleted tasks (their result folders are the
    /// caller's to remove), or `None` if the scenario does not exist.
    pub async fn delete_with_tasks(
        pool: &PgPool,
        id: Uuid,
    ) -> Result<Option<Vec<DbId>>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        // Tasks must go first: the owner lookup joins the item tables.
        let task_ids = TaskRepo::delete_for_scenario(&mut *tx, id).await?;
        let result = sqlx::query("DELETE FROM scenarios WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(None);
        }

        tx.commit().await?;
        tracing::info!(scenario_id = %id, tasks = task_ids.len(), "Deleted scenario");
        Ok(Some(task_ids))
    }

    /// Copy a scenario with all of its items into a new scenario.
    ///
    /// Every item keeps its internal id; its primary key is re-derived in the
    /// namespace of the new scenario, and references between items (solar ->
    /// area, file owners) are remapped the same way. Tasks are not copied.
    /// Returns `None` if the source scenario does not exist.
    pub async fn duplicate(
        pool: &PgPool,
        source_id: Uuid,
        input: &DuplicateScenario,
    ) -> Result<Option<Scenario>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let Some(source) = Self::find_by_id(&mut *tx, source_id).await? else {
            return Ok(None);
        };

        let target_id = input.id.unwrap_or_else(Uuid::new_v4);
        let name = input.name.as_deref().or(source.name.as_deref());
        let target = Self::insert(&mut *tx, target_id, name, source.manager_id).await?;

        let areas = AreaRepo::list_by_scenario(&mut *tx, source_id).await?;
        let solar = SolarRepo::list_by_scenario(&mut *tx, source_id).await?;
        let settings = SettingsRepo::list_by_scenario(&mut *tx, source_id).await?;
        let files = UploadedFileRepo::list_by_scenario(&mut *tx, source_id).await?;

        let internal_ids = areas
            .iter()
            .map(|a| a.internal_id)
            .chain(solar.iter().map(|s| s.internal_id))
            .chain(settings.iter().map(|s| s.internal_id))
            .chain(files.iter().map(|f| f.internal_id));
        let id_map = remap_ids(source_id, target_id, internal_ids);

        for area in &areas {
            let key = ItemKey::new(target_id, area.internal_id);
            AreaRepo::create(&mut *tx, &key, &area.geom).await?;
        }
        for asset in &solar {
            let key = ItemKey::new(target_id, asset.internal_id);
            let area_id = id_map.get(&asset.area_id).copied().unwrap_or(asset.area_id);
            SolarRepo::create(&mut *tx, &key, area_id).await?;
        }
        for entry in &settings {
            let key = ItemKey::new(target_id, entry.internal_id);
            SettingsRepo::create(&mut *tx, &key, &entry.settings).await?;
        }
        for file in &files {
            let key = ItemKey::new(target_id, file.internal_id);
            let owner = file
                .owner()
                .map_err(|e| sqlx::Error::Decode(Box::new(e)))?;
            let owner_id = id_map.get(&owner.id()).copied().unwrap_or(owner.id());
            let input = CreateUploadedFile {
                name: file.name.clone(),
                file_path: file.file_path.clone(),
                owner: owner.with_id(owner_id),
            };
            UploadedFileRepo::create(&mut *tx, &key, &input).await?;
        }

        tx.commit().await?;
        tracing::info!(
            source_id = %source_id,
            target_id = %target_id,
            items = areas.len() + solar.len() + settings.len() + files.len(),
            "Duplicated scenario",
        );
        Ok(Some(target))
    }
}
