//! Repository for the `jobs` table.

use sqlx::PgPool;

use gradlink_core::types::DbId;

use crate::models::job::Job;

/// Column list for `jobs` queries.
const COLUMNS: &str = "id, owner_id, title, is_active, created_at, updated_at";

/// Read-side access to jobs (managed elsewhere).
pub struct JobRepo;

impl JobRepo {
    /// Find an active job by id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Job>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM jobs WHERE id = $1 AND is_active = true");
        sqlx::query_as::<_, Job>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
