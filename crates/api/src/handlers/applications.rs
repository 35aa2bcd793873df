//! Handler for inbound webhook deliveries.

use std::future::Future;
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;

use crate::state::AppState;
use crate::tally::pipeline::{self, IngestOutcome};
use crate::tally::SIGNATURE_HEADER;

/// Hard ceiling on pipeline time per delivery. Kept under the server's
/// request timeout so a stalled store still produces a 200 acknowledgment
/// instead of a middleware-level 408.
const ACK_DEADLINE: Duration = Duration::from_secs(25);

/// POST /api/v1/applications
///
/// The webhook endpoint the form provider delivers to. Unauthenticated at
/// the transport layer; trust is established by the payload signature
/// inside the pipeline. Always answers 200 -- see `tally::pipeline` for
/// why failures are not surfaced here.
pub async fn ingest(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Json<IngestOutcome> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok());

    Json(acknowledge_within(ACK_DEADLINE, pipeline::process_delivery(&state, &body, signature)).await)
}

/// Run the pipeline with a deadline, collapsing a timeout into a rejection.
async fn acknowledge_within<F>(deadline: Duration, work: F) -> IngestOutcome
where
    F: Future<Output = IngestOutcome>,
{
    match tokio::time::timeout(deadline, work).await {
        Ok(outcome) => outcome,
        Err(_) => {
            tracing::error!(
                deadline_secs = deadline.as_secs(),
                "Delivery processing exceeded deadline, acknowledging as rejected"
            );
            IngestOutcome::rejected()
        }
    }
}
