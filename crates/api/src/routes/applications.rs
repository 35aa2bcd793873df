//! Route definitions for the webhook ingestion endpoint.

use axum::routing::post;
use axum::Router;

use crate::handlers::applications;
use crate::state::AppState;

/// Routes mounted at `/applications`.
///
/// ```text
/// POST /  -> ingest (public; trust established by payload signature)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/applications", post(applications::ingest))
}
