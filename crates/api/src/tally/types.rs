//! Webhook payload DTOs for Tally deliveries.
//!
//! Only the parts of the payload the pipeline needs are typed; the raw body
//! is stored alongside the submission so nothing is lost by the narrow
//! parse. Unknown fields are ignored on purpose: the provider adds payload
//! attributes without notice.

use serde::Deserialize;

use gradlink_core::forms::AUTH_TOKEN_FIELD_LABEL;

/// Event type for completed form submissions. Other event types are
/// acknowledged and dropped.
pub const EVENT_FORM_RESPONSE: &str = "FORM_RESPONSE";

/// Top-level webhook delivery envelope.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookEnvelope {
    pub event_id: String,
    pub event_type: String,
    pub data: WebhookData,
}

/// The `data` object of a `FORM_RESPONSE` delivery.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookData {
    pub submission_id: String,
    pub form_id: String,
    #[serde(default)]
    pub form_name: Option<String>,
    #[serde(default)]
    pub fields: Vec<WebhookField>,
}

/// One answered form field.
///
/// `label` carries the original form-builder field name; hidden fields are
/// matched by label because that is the identifier we control end to end.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookField {
    pub key: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(rename = "type", default)]
    pub field_type: Option<String>,
    #[serde(default)]
    pub value: serde_json::Value,
}

impl WebhookData {
    /// Locate the hidden session-token field by its canonical label.
    ///
    /// Returns `None` when the field is absent or its value is not a
    /// non-empty string.
    pub fn auth_token(&self) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.label.as_deref() == Some(AUTH_TOKEN_FIELD_LABEL))
            .and_then(|f| f.value.as_str())
            .filter(|v| !v.is_empty())
    }
}
