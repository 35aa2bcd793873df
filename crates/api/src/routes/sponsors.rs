//! Route definitions for the job-owner `/sponsors` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::sponsors;
use crate::state::AppState;

/// Routes mounted at `/sponsors`.
///
/// ```text
/// POST /sponsors/jobs/{job_id}/form           -> create_form
/// GET  /sponsors/forms/{form_id}/submissions  -> list_submissions
/// PUT  /sponsors/submissions/{submission_id}  -> review_submission
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/sponsors/jobs/{job_id}/form", post(sponsors::create_form))
        .route(
            "/sponsors/forms/{form_id}/submissions",
            get(sponsors::list_submissions),
        )
        .route(
            "/sponsors/submissions/{submission_id}",
            put(sponsors::review_submission),
        )
}
