//! Repository for the `tasks` table.

use ports_core::owner::{OwnerKind, TaskOwner};
use ports_core::types::DbId;
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use crate::models::task::{CreateTask, Task};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, parent_task_id, task_type, owner_kind, owner_id, created_at";

/// Provides CRUD operations for tasks.
pub struct TaskRepo;

impl TaskRepo {
    /// Insert a new task, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateTask) -> Result<Task, sqlx::Error> {
        let query = format!(
            "INSERT INTO tasks (parent_task_id, task_type, owner_kind, owner_id)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(input.parent_task_id)
            .bind(&input.task_type)
            .bind(input.owner.kind().as_str())
            .bind(input.owner.id())
            .fetch_one(pool)
            .await
    }

    /// Find a task by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Task>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tasks WHERE id = $1");
        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List the direct children of a task, oldest first.
    pub async fn list_children(pool: &PgPool, parent_id: DbId) -> Result<Vec<Task>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM tasks WHERE parent_task_id = $1 ORDER BY created_at, id"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(parent_id)
            .fetch_all(pool)
            .await
    }

    /// List all tasks attached to `owner`, oldest first.
    pub async fn list_by_owner(pool: &PgPool, owner: &TaskOwner) -> Result<Vec<Task>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM tasks
             WHERE owner_kind = $1 AND owner_id = $2
             ORDER BY created_at, id"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(owner.kind().as_str())
            .bind(owner.id())
            .fetch_all(pool)
            .await
    }

    /// Delete a task by ID. Progress records and child tasks cascade.
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete every task attached to a scenario or to one of its items,
    /// together with all of their descendants.
    ///
    /// Returns the ids of all removed tasks, descendants included.
    pub async fn delete_for_scenario<'e>(
        executor: impl PgExecutor<'e>,
        scenario_id: Uuid,
    ) -> Result<Vec<DbId>, sqlx::Error> {
        let query = format!(
            "WITH RECURSIVE doomed AS (
                 SELECT id FROM tasks WHERE {owned}
                 UNION
                 SELECT t.id FROM tasks t JOIN doomed d ON t.parent_task_id = d.id
             )
             DELETE FROM tasks WHERE id IN (SELECT id FROM doomed)
             RETURNING id",
            owned = scenario_owner_condition(),
        );
        sqlx::query_scalar::<_, DbId>(&query)
            .bind(scenario_id)
            .fetch_all(executor)
            .await
    }
}

/// SQL condition matching tasks owned by scenario `$1` or by any of its items.
///
/// Built from the [`OwnerKind::ALL`] lookup table; no user input is involved.
fn scenario_owner_condition() -> String {
    OwnerKind::ALL
        .iter()
        .map(|(kind, name)| match kind {
            OwnerKind::Scenario => format!("(owner_kind = '{name}' AND owner_id = $1)"),
            _ => format!(
                "(owner_kind = '{name}' AND owner_id IN (SELECT id FROM {table} WHERE scenario_id = $1))",
                table = kind.table(),
            ),
        })
        .collect::<Vec<_>>()
        .join(" OR ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owner_condition_covers_every_kind() {
        let condition = scenario_owner_condition();
        for (kind, name) in OwnerKind::ALL {
            assert!(condition.contains(&format!("owner_kind = '{name}'")));
            if kind != OwnerKind::Scenario {
                assert!(condition.contains(&format!("FROM {} WHERE", kind.table())));
            }
        }
    }
}
