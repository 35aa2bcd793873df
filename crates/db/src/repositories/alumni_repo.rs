//! Repository for the `alumni` table.

use sqlx::PgPool;

use gradlink_core::types::DbId;

use crate::models::applicant::Applicant;
use crate::repositories::member_repo::APPLICANT_COLUMNS;

/// Read-side access to alumni profiles (managed elsewhere).
pub struct AlumniRepo;

impl AlumniRepo {
    /// Find an active alumnus by id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Applicant>, sqlx::Error> {
        let query =
            format!("SELECT {APPLICANT_COLUMNS} FROM alumni WHERE id = $1 AND is_active = true");
        sqlx::query_as::<_, Applicant>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
