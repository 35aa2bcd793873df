//! Repository for the `members` table.

use sqlx::PgPool;

use gradlink_core::types::DbId;

use crate::models::applicant::Applicant;

/// Column list shared by both applicant tables.
pub(crate) const APPLICANT_COLUMNS: &str = "id, name, email, is_active, created_at, updated_at";

/// Read-side access to member profiles (managed elsewhere).
pub struct MemberRepo;

impl MemberRepo {
    /// Find an active member by id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Applicant>, sqlx::Error> {
        let query =
            format!("SELECT {APPLICANT_COLUMNS} FROM members WHERE id = $1 AND is_active = true");
        sqlx::query_as::<_, Applicant>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
