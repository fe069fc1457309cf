//! Repository for the `uploaded_files` table.

use ports_core::scenario_id::ItemKey;
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use crate::models::uploaded_file::{CreateUploadedFile, UploadedFile};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, internal_id, scenario_id, name, file_path, owner_kind, owner_id";

/// Provides CRUD operations for uploaded files.
pub struct UploadedFileRepo;

impl UploadedFileRepo {
    /// Insert a file row under a derived key, returning the created row.
    pub async fn create<'e>(
        executor: impl PgExecutor<'e>,
        key: &ItemKey,
        input: &CreateUploadedFile,
    ) -> Result<UploadedFile, sqlx::Error> {
        let query = format!(
            "INSERT INTO uploaded_files
                (id, internal_id, scenario_id, name, file_path, owner_kind, owner_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UploadedFile>(&query)
            .bind(key.id())
            .bind(key.internal_id())
            .bind(key.scenario_id())
            .bind(&input.name)
            .bind(&input.file_path)
            .bind(input.owner.kind().as_str())
            .bind(input.owner.id())
            .fetch_one(executor)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<UploadedFile>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM uploaded_files WHERE id = $1");
        sqlx::query_as::<_, UploadedFile>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List the uploaded files of a scenario ordered by internal id.
    pub async fn list_by_scenario<'e>(
        executor: impl PgExecutor<'e>,
        scenario_id: Uuid,
    ) -> Result<Vec<UploadedFile>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM uploaded_files WHERE scenario_id = $1 ORDER BY internal_id"
        );
        sqlx::query_as::<_, UploadedFile>(&query)
            .bind(scenario_id)
            .fetch_all(executor)
            .await
    }
}
