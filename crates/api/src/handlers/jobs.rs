//! Applicant-facing application-session issuance.

use axum::extract::{Path, State};
use axum::Json;
use chrono::{Duration, Utc};
use serde::Serialize;
use uuid::Uuid;

use gradlink_core::error::CoreError;
use gradlink_core::forms::AUTH_TOKEN_FIELD_LABEL;
use gradlink_core::roles::ApplicantRole;
use gradlink_core::types::{DbId, Timestamp};
use gradlink_db::models::applicant::Applicant;
use gradlink_db::repositories::{
    AlumniRepo, FormRepo, JobRepo, MemberRepo, NonceRepo, SubmissionRepo,
};

use crate::auth::session_token;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Response body for `GET /jobs/{job_id}/apply`.
#[derive(Debug, Serialize)]
pub struct ApplySessionResponse {
    pub has_form: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub form_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embed_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub already_applied: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submission_date: Option<Timestamp>,
}

/// GET /api/v1/jobs/{job_id}/apply
///
/// Open an application session: mints a nonce + session token and returns
/// the embed URL with the token pre-filled into the hidden field. Short-
/// circuits to `already_applied` when a submission already exists for this
/// applicant's email on the job's form.
pub async fn apply_session(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(job_id): Path<DbId>,
) -> AppResult<Json<ApplySessionResponse>> {
    // Only the applicant roles may open application sessions.
    let role = ApplicantRole::parse(&auth.role).map_err(|_| {
        AppError::Core(CoreError::Forbidden(
            "Only members and alumni can apply to jobs".into(),
        ))
    })?;

    let job = JobRepo::find_by_id(&state.pool, job_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Job",
            id: job_id,
        }))?;

    let Some(form) = FormRepo::find_active_by_job(&state.pool, job.id).await? else {
        return Ok(Json(ApplySessionResponse {
            has_form: false,
            form_title: None,
            embed_url: None,
            preview_url: None,
            already_applied: None,
            submission_date: None,
        }));
    };

    let applicant = resolve_applicant(&state, role, auth.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Applicant",
            id: auth.user_id,
        }))?;

    let embed_base = state.config.tally.embed_base.trim_end_matches('/');
    let preview_url = format!("{embed_base}/r/{}", form.tally_form_id);

    // Already applied: answer with the original submission date instead of
    // minting a fresh session.
    if let Some(existing) =
        SubmissionRepo::find_by_email_and_form(&state.pool, &applicant.email, form.id).await?
    {
        return Ok(Json(ApplySessionResponse {
            has_form: true,
            form_title: Some(form.title),
            embed_url: None,
            preview_url: Some(preview_url),
            already_applied: Some(true),
            submission_date: Some(existing.submitted_at),
        }));
    }

    let nonce = Uuid::new_v4().to_string();
    let ttl_hours = state.config.tally.nonce_ttl_hours;
    let expires_at = Utc::now() + Duration::hours(ttl_hours);
    NonceRepo::create(&state.pool, &nonce, applicant.id, role, job.id, expires_at).await?;

    let token = session_token::issue(
        applicant.id,
        role,
        &applicant.email,
        job.id,
        form.id,
        &nonce,
        ttl_hours,
        &state.config.tally.session_token_secret,
    )
    .map_err(|e| AppError::Core(CoreError::Internal(format!("Token signing failed: {e}"))))?;

    tracing::info!(
        applicant_id = applicant.id,
        role = %role,
        job_id = job.id,
        form_id = form.id,
        "Issued application session"
    );

    Ok(Json(ApplySessionResponse {
        has_form: true,
        form_title: Some(form.title),
        embed_url: Some(format!(
            "{embed_base}/embed/{}?{AUTH_TOKEN_FIELD_LABEL}={token}",
            form.tally_form_id
        )),
        preview_url: Some(preview_url),
        already_applied: None,
        submission_date: None,
    }))
}

/// Pick the profile store matching the authenticated role.
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
