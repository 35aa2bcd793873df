//! Route definitions for the applicant-facing `/jobs` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::jobs;
use crate::state::AppState;

/// Routes mounted at `/jobs`.
///
/// ```text
/// GET /jobs/{job_id}/apply  -> apply_session (requires member/alumni auth)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/jobs/{job_id}/apply", get(jobs::apply_session))
}
