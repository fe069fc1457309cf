//! Existence checks for task and file owners.

use ports_core::owner::TaskOwner;
use sqlx::PgPool;
use uuid::Uuid;

/// Resolves [`TaskOwner`] references against their tables.
pub struct OwnerRepo;

impl OwnerRepo {
    /// Whether the row an owner reference points to exists.
    pub async fn exists(pool: &PgPool, owner: &TaskOwner) -> Result<bool, sqlx::Error> {
        let query = format!(
            "SELECT EXISTS (SELECT 1 FROM {} WHERE id = $1)",
            owner.kind().table()
        );
        sqlx::query_scalar::<_, bool>(&query)
            .bind(owner.id())
            .fetch_one(pool)
            .await
    }

    /// The scenario an owner belongs to (the scenario itself for scenario
    /// owners). `None` if the owner row does not exist.
    pub async fn scenario_of(
        pool: &PgPool,
        owner: &TaskOwner,
    ) -> Result<Option<Uuid>, sqlx::Error> {
        if let TaskOwner::Scenario(id) = owner {
            let exists = Self::exists(pool, owner).await?;
            return Ok(exists.then_some(*id));
        }
        let query = format!(
            "SELECT scenario_id FROM {} WHERE id = $1",
            owner.kind().table()
        );
        sqlx::query_scalar::<_, Uuid>(&query)
            .bind(owner.id())
            .fetch_optional(pool)
            .await
    }
}
