//! Route definitions.

pub mod applications;
pub mod health;
pub mod jobs;
pub mod sponsors;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /applications                            webhook ingestion (public, payload-signed)
///
/// /jobs/{job_id}/apply                     open an application session (member/alumni)
///
/// /sponsors/jobs/{job_id}/form             create form + webhook (owner/admin)
/// /sponsors/forms/{form_id}/submissions    list submissions (owner/admin)
/// /sponsors/submissions/{submission_id}    review a submission (owner/admin)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(applications::router())
        .merge(jobs::router())
        .merge(sponsors::router())
}
