//! Applicant profile models.

use serde::Serialize;
use sqlx::FromRow;

use gradlink_core::types::{DbId, Timestamp};

/// A row from either the `members` or `alumni` table.
///
/// Both tables share this shape; the role is implied by the table the row
/// was read from and travels separately.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Applicant {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
