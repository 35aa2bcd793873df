//! Webhook registration models and DTOs.

use serde::Serialize;
use sqlx::FromRow;

use gradlink_core::types::{DbId, Timestamp};

/// A row from the `form_webhooks` table.
///
/// The signing secret is write-only from the API's perspective: it is
/// generated at registration time and only ever read back to verify
/// inbound deliveries, so it is excluded from serialization.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct FormWebhook {
    pub id: DbId,
    pub form_id: DbId,
    pub tally_webhook_id: String,
    pub callback_url: String,
    #[serde(skip_serializing)]
    pub signing_secret: String,
    pub is_active: bool,
    pub delivery_count: i64,
    pub error_count: i64,
    pub last_error: Option<String>,
    pub last_synced_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Input for creating a webhook registration.
#[derive(Debug, Clone)]
pub struct CreateFormWebhook {
    pub form_id: DbId,
    pub tally_webhook_id: String,
    pub callback_url: String,
    pub signing_secret: String,
}
