//! Form-builder block conventions for the Tally integration.
//!
//! Every application form carries one hidden field that the applicant never
//! sees: the signed session token binding the submission to an applicant.
//! The same identifier is used both when the field is injected into the
//! form definition and when the webhook payload is searched for the token,
//! so the two sides can never drift apart.

use serde_json::{json, Value};
use uuid::Uuid;

/// Canonical identifier of the hidden session-token field.
///
/// Used as the hidden field's name in the form definition, as the query
/// parameter that pre-fills it in embed URLs, and as the `label` matched in
/// webhook payloads.
pub const AUTH_TOKEN_FIELD_LABEL: &str = "platform-applicant-auth-token";

/// Tally block type for the form title.
const BLOCK_TYPE_TITLE: &str = "FORM_TITLE";

/// Tally block type for hidden fields.
const BLOCK_TYPE_HIDDEN: &str = "HIDDEN_FIELDS";

/// Inject the hidden auth-token field into a form definition.
///
/// The block is inserted immediately after the title block, or at the front
/// when the definition has no title. Blocks are kept as raw JSON because the
/// form builder owns their schema; only the hidden field is ours.
pub fn inject_auth_token_field(blocks: &mut Vec<Value>) {
    let block = json!({
        "uuid": Uuid::new_v4().to_string(),
        "type": BLOCK_TYPE_HIDDEN,
        "groupUuid": Uuid::new_v4().to_string(),
        "groupType": BLOCK_TYPE_HIDDEN,
        "payload": {
            "name": AUTH_TOKEN_FIELD_LABEL,
        },
    });

    let title_idx = blocks
        .iter()
        .position(|b| b.get("type").and_then(Value::as_str) == Some(BLOCK_TYPE_TITLE));

    match title_idx {
        Some(idx) => blocks.insert(idx + 1, block),
        None => blocks.insert(0, block),
    }
}
