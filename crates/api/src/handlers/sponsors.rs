//! Job-owner endpoints: form creation and submission review.
//!
//! All handlers start with an explicit ownership guard
//! ([`ensure_owner_or_admin`]) on the job backing the resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use rand::RngCore;
use serde::Deserialize;
use serde_json::Value;
use validator::Validate;

use gradlink_core::error::CoreError;
use gradlink_core::forms::inject_auth_token_field;
use gradlink_core::review::{validate_review_status, REVIEW_STATUS_UNREAD};
use gradlink_core::types::DbId;
use gradlink_db::models::form::{CreateForm, Form};
use gradlink_db::models::submission::UpdateReview;
use gradlink_db::models::webhook::CreateFormWebhook;
use gradlink_db::repositories::{FormRepo, JobRepo, SubmissionRepo, WebhookRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::{ensure_owner_or_admin, AuthUser};
use crate::state::AppState;

/// Request body for `POST /sponsors/jobs/{job_id}/form`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateFormRequest {
    /// Title shown in submission listings; the rendered title lives in the
    /// block list.
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    /// Tally form-builder block list. Schema owned by the provider.
    pub blocks: Vec<Value>,
}

/// Length in bytes of generated webhook signing secrets.
const SIGNING_SECRET_BYTES: usize = 32;

/// Generate a fresh per-webhook signing secret (hex, `whsec_` prefixed).
fn generate_signing_secret() -> String {
    let mut bytes = [0u8; SIGNING_SECRET_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    let hex: String = bytes.iter().map(|b| format!("{b:02x}")).collect();
    format!("whsec_{hex}")
}

/// POST /api/v1/sponsors/jobs/{job_id}/form
///
/// Build the application form on the provider and register its webhook.
/// The hidden session-token field is injected into the block list before
/// it leaves this service, so every rendered form carries the token slot.
pub async fn create_form(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(job_id): Path<DbId>,
    Json(input): Json<CreateFormRequest>,
) -> AppResult<(StatusCode, Json<Form>)> {
    input
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let job = JobRepo::find_by_id(&state.pool, job_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Job",
            id: job_id,
        }))?;
    ensure_owner_or_admin(job.owner_id, &auth)?;

    if FormRepo::find_active_by_job(&state.pool, job.id).await?.is_some() {
        return Err(AppError::Core(CoreError::Conflict(
            "Job already has an active application form".into(),
        )));
    }

    let mut blocks = input.blocks;
    inject_auth_token_field(&mut blocks);

    let tally_form_id = state.provider.create_form(blocks).await?;

    let signing_secret = generate_signing_secret();
    let callback_url = state.config.tally.webhook_callback_url();
    let tally_webhook_id = state
        .provider
        .create_webhook(&tally_form_id, &callback_url, &signing_secret)
        .await?;

    let form = FormRepo::create(
        &state.pool,
        &CreateForm {
            job_id: job.id,
            tally_form_id,
            title: input.title,
        },
    )
    .await?;

    WebhookRepo::create(
        &state.pool,
        &CreateFormWebhook {
            form_id: form.id,
            tally_webhook_id,
            callback_url,
            signing_secret,
        },
    )
    .await?;

    tracing::info!(form_id = form.id, job_id = job.id, "Created application form");
    Ok((StatusCode::CREATED, Json(form)))
}

/// GET /api/v1/sponsors/forms/{form_id}/submissions
///
/// List a form's submissions, newest first. Owner or admin only.
pub async fn list_submissions(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(form_id): Path<DbId>,
) -> AppResult<Json<serde_json::Value>> {
    let form = FormRepo::find_by_id(&state.pool, form_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Form",
            id: form_id,
        }))?;
    let job = JobRepo::find_by_id(&state.pool, form.job_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Job",
            id: form.job_id,
        }))?;
    ensure_owner_or_admin(job.owner_id, &auth)?;

    let submissions = SubmissionRepo::list_for_form(&state.pool, form.id).await?;
    Ok(Json(serde_json::json!({ "data": submissions })))
}

/// PUT /api/v1/sponsors/submissions/{submission_id}
///
/// Move a submission through the review workflow. The first transition
/// away from `unread` stamps the reviewer id and timestamp.
pub async fn review_submission(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(submission_id): Path<DbId>,
    Json(input): Json<UpdateReview>,
) -> AppResult<Json<gradlink_db::models::submission::Submission>> {
    validate_review_status(&input.status).map_err(AppError::Core)?;

    let submission = SubmissionRepo::find_by_id(&state.pool, submission_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Submission",
            id: submission_id,
        }))?;
    let form = FormRepo::find_by_id(&state.pool, submission.form_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Form",
            id: submission.form_id,
        }))?;
    let job = JobRepo::find_by_id(&state.pool, form.job_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Job",
            id: form.job_id,
        }))?;
    ensure_owner_or_admin(job.owner_id, &auth)?;

    // Stamp the reviewer on the first transition out of unread.
    let reviewer = (submission.status == REVIEW_STATUS_UNREAD
        && input.status != REVIEW_STATUS_UNREAD)
        .then_some(auth.user_id);

    let updated = SubmissionRepo::update_review(
        &state.pool,
        submission.id,
        &input.status,
        input.notes.as_deref(),
        reviewer,
    )
    .await?
    .ok_or(AppError::Core(CoreError::NotFound {
        entity: "Submission",
        id: submission.id,
    }))?;

    Ok(Json(updated))
}
