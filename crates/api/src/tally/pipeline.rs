//! Webhook ingestion pipeline.
//!
//! Turns one inbound Tally delivery into at most one submission row. The
//! endpoint is reachable without authentication, so every input is treated
//! as adversarial: the payload signature, the session token, and the nonce
//! must all check out before anything is written.
//!
//! The outward contract is always-acknowledge: whatever happens inside,
//! the transport response is a 200 with `{success, submissionId}`. Surfacing
//! failures as HTTP errors would invite provider-side retry storms and give
//! an attacker an oracle separating "wrong signature" from "unknown form";
//! rejections are visible only in logs and the registration's error counter.

use chrono::Utc;
use serde::Serialize;

use gradlink_core::nonces::NONCE_STATUS_PENDING;
use gradlink_core::roles::ApplicantRole;
use gradlink_core::signature::verify_signature;
use gradlink_core::types::DbId;
use gradlink_db::models::applicant::Applicant;
use gradlink_db::models::submission::CreateSubmission;
use gradlink_db::repositories::{
    AlumniRepo, FormRepo, MemberRepo, NonceRepo, SubmissionRepo, WebhookRepo,
};

use crate::auth::session_token;
use crate::state::AppState;
use crate::tally::types::{WebhookEnvelope, EVENT_FORM_RESPONSE};

/// The acknowledgment body returned for every delivery.
#[derive(Debug, Clone, Serialize)]
pub struct IngestOutcome {
    pub success: bool,
    #[serde(rename = "submissionId")]
    pub submission_id: String,
}

impl IngestOutcome {
    fn accepted(submission_id: DbId) -> Self {
        Self {
            success: true,
            submission_id: submission_id.to_string(),
        }
    }

    pub(crate) fn rejected() -> Self {
        Self {
            success: false,
            submission_id: String::new(),
        }
    }
}

/// Why a delivery was rejected. Terminal states of the pipeline; each maps
/// to one short-circuit point in [`run`].
#[derive(Debug)]
enum Rejection {
    /// Body was not a parseable `FORM_RESPONSE` payload.
    BadPayload(String),
    /// No active form matches the delivery's form id.
    UnknownForm(String),
    /// Registration missing, or present without a usable signing secret.
    /// The id is carried when a row exists so the error can be recorded on it.
    Misconfigured {
        webhook_id: Option<DbId>,
        reason: String,
    },
    /// Payload signature did not verify against the registration secret.
    BadSignature { webhook_id: DbId },
    /// Hidden session-token field missing, or the token failed to decode.
    BadToken(String),
    /// Nonce missing, already used, expired, or lost to a concurrent delivery.
    NonceInvalid(String),
    /// The applicant named by the token no longer resolves to a profile.
    ApplicantMissing { applicant_id: DbId, role: String },
    /// Unexpected persistence failure at any step.
    Store(sqlx::Error),
}

impl From<sqlx::Error> for Rejection {
    fn from(err: sqlx::Error) -> Self {
        Rejection::Store(err)
    }
}

/// Process one webhook delivery end to end.
///
/// Never fails at the transport level: every internal rejection collapses
/// into `{success: false, submissionId: ""}` after logging and, where a
/// registration is identifiable, recording the error against it.
pub async fn process_delivery(
    state: &AppState,
    raw_body: &[u8],
    signature_header: Option<&str>,
) -> IngestOutcome {
    match run(state, raw_body, signature_header).await {
        Ok(submission_id) => IngestOutcome::accepted(submission_id),
        Err(rejection) => {
            record_rejection(state, &rejection).await;
            IngestOutcome::rejected()
        }
    }
}

/// The pipeline proper: short-circuits to a [`Rejection`] at the first
/// failing step, in strict order, with the idempotency check placed before
/// any mutation so retried deliveries are side-effect-free.
async fn run(
    state: &AppState,
    raw_body: &[u8],
    signature_header: Option<&str>,
) -> Result<DbId, Rejection> {
    let pool = &state.pool;

    // 1. Parse the payload.
    let envelope: WebhookEnvelope = serde_json::from_slice(raw_body)
        .map_err(|e| Rejection::BadPayload(format!("Unparseable delivery body: {e}")))?;
    if envelope.event_type != EVENT_FORM_RESPONSE {
        return Err(Rejection::BadPayload(format!(
            "Ignoring event type {}",
            envelope.event_type
        )));
    }
    let data = &envelope.data;

    // 2. Resolve the active form.
    let form = FormRepo::find_active_by_tally_id(pool, &data.form_id)
        .await?
        .ok_or_else(|| Rejection::UnknownForm(data.form_id.clone()))?;

    // 3. Resolve the registration and its signing secret.
    let webhook = WebhookRepo::find_active_by_form(pool, form.id)
        .await?
        .ok_or_else(|| Rejection::Misconfigured {
            webhook_id: None,
            reason: format!("No webhook registration for form {}", form.id),
        })?;
    if webhook.signing_secret.is_empty() {
        return Err(Rejection::Misconfigured {
            webhook_id: Some(webhook.id),
            reason: "Webhook registration has no signing secret".into(),
        });
    }

    // 4. Verify the payload signature over the exact raw body.
    if !verify_signature(raw_body, signature_header, &webhook.signing_secret) {
        return Err(Rejection::BadSignature {
            webhook_id: webhook.id,
        });
    }

    // 5. Idempotency gate: a known submission id is a success, replayed.
    if let Some(existing) = SubmissionRepo::find_by_tally_id(pool, &data.submission_id).await? {
        tracing::debug!(
            submission_id = existing.id,
            tally_submission_id = %data.submission_id,
            "Duplicate delivery, returning existing submission"
        );
        return Ok(existing.id);
    }

    // 6. Locate the hidden session-token field.
    let token = data
        .auth_token()
        .ok_or_else(|| Rejection::BadToken("Hidden auth-token field missing or empty".into()))?;

    // 7. Decode the session token.
    let claims = session_token::decode_token(token, &state.config.tally.session_token_secret)
        .map_err(|e| Rejection::BadToken(e.to_string()))?;

    // 8. The token must have been issued for this form. A valid session for
    //    another job's form must not ride this delivery.
    if claims.form_id != form.id || claims.job_id != form.job_id {
        return Err(Rejection::BadToken(format!(
            "Session token bound to form {} / job {}, delivery is for form {} / job {}",
            claims.form_id, claims.job_id, form.id, form.job_id
        )));
    }

    // 9. Validate the nonce: present, pending, unexpired.
    let nonce = NonceRepo::find(pool, &claims.nonce)
        .await?
        .ok_or_else(|| Rejection::NonceInvalid("Nonce not found".into()))?;
    if nonce.status != NONCE_STATUS_PENDING {
        return Err(Rejection::NonceInvalid("Nonce already used".into()));
    }
    if nonce.expires_at <= Utc::now() {
        return Err(Rejection::NonceInvalid("Nonce expired".into()));
    }

    // 10. Snapshot the applicant's current profile.
    let applicant = resolve_applicant(state, claims.role, claims.sub)
        .await?
        .ok_or(Rejection::ApplicantMissing {
            applicant_id: claims.sub,
            role: claims.role.as_str().to_string(),
        })?;

    // 11. Consume the nonce. A false here means a concurrent delivery won
    //     between steps 9 and 11.
    if !NonceRepo::mark_used(pool, &claims.nonce).await? {
        return Err(Rejection::NonceInvalid(
            "Nonce consumed by a concurrent delivery".into(),
        ));
    }

    // 12. Create the submission; a conflict means another delivery beat us
    //     to the insert, which is the duplicate-success path.
    let input = CreateSubmission {
        form_id: form.id,
        tally_submission_id: data.submission_id.clone(),
        applicant_id: applicant.id,
        applicant_role: claims.role.as_str().to_string(),
        applicant_email: applicant.email.clone(),
        applicant_name: applicant.name.clone(),
        payload: serde_json::from_slice(raw_body).unwrap_or_default(),
    };
    let submission = match SubmissionRepo::create_if_absent(pool, &input).await? {
        Some(created) => created,
        None => SubmissionRepo::find_by_tally_id(pool, &data.submission_id)
            .await?
            .ok_or_else(|| Rejection::Store(sqlx::Error::RowNotFound))?,
    };

    // 13. Success-path counters. The submission exists at this point, so a
    //     counter failure is logged rather than turned into a rejection.
    if let Err(e) = FormRepo::increment_submission_count(pool, form.id).await {
        tracing::error!(error = %e, form_id = form.id, "Failed to bump submission counter");
    }
    if let Err(e) = WebhookRepo::record_delivery(pool, webhook.id, true, None).await {
        tracing::error!(error = %e, webhook_id = webhook.id, "Failed to record delivery");
    }

    tracing::info!(
        submission_id = submission.id,
        form_id = form.id,
        applicant_id = applicant.id,
        role = %claims.role,
        "Stored application submission"
    );
    Ok(submission.id)
}

/// Pick the profile store matching the role carried in the token.
async fn resolve_applicant(
    state: &AppState,
    role: ApplicantRole,
    applicant_id: DbId,
) -> Result<Option<Applicant>, sqlx::Error> {
    match role {
        ApplicantRole::Member => MemberRepo::find_by_id(&state.pool, applicant_id).await,
        ApplicantRole::Alumni => AlumniRepo::find_by_id(&state.pool, applicant_id).await,
    }
}

/// Log a rejection and, when a registration is identifiable, record the
/// error against it. Recording failures are logged and dropped; they must
/// not break the acknowledgment.
async fn record_rejection(state: &AppState, rejection: &Rejection) {
    let pool = &state.pool;

    let recorded = match rejection {
        Rejection::BadPayload(reason) => {
            tracing::warn!(%reason, "Delivery rejected: bad payload");
            Ok(())
        }
        Rejection::UnknownForm(tally_form_id) => {
            tracing::warn!(%tally_form_id, "Delivery rejected: no active form");
            Ok(())
        }
        Rejection::Misconfigured { webhook_id, reason } => {
            tracing::warn!(?webhook_id, %reason, "Delivery rejected: misconfigured webhook");
            match webhook_id {
                Some(id) => WebhookRepo::record_delivery(pool, *id, false, Some(reason)).await,
                None => Ok(()),
            }
        }
        Rejection::BadSignature { webhook_id } => {
            tracing::warn!(webhook_id, "Delivery rejected: invalid signature");
            WebhookRepo::record_delivery(pool, *webhook_id, false, Some("Invalid signature")).await
        }
        Rejection::BadToken(reason) => {
            tracing::warn!(%reason, "Delivery rejected: bad session token");
            Ok(())
        }
        Rejection::NonceInvalid(reason) => {
            tracing::warn!(%reason, "Delivery rejected: invalid nonce");
            Ok(())
        }
        Rejection::ApplicantMissing { applicant_id, role } => {
            tracing::warn!(applicant_id, %role, "Delivery rejected: applicant not found");
            Ok(())
        }
        Rejection::Store(err) => {
            tracing::error!(error = %err, "Delivery rejected: store error");
            Ok(())
        }
    };

    if let Err(e) = recorded {
        tracing::error!(error = %e, "Failed to record webhook error");
    }
}
