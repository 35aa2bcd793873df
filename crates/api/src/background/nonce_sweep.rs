//! Periodic cleanup of expired application nonces.
//!
//! Nonces are never deleted on the request path; used and expired rows
//! stay in place until this sweep removes the expired ones, keeping the
//! ledger bounded. The sweep only touches rows whose expiry has passed, so
//! it is safe to run alongside request handling and alongside other
//! replicas running the same sweep.

use std::time::Duration;

use chrono::Utc;
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;

use gradlink_db::repositories::NonceRepo;

/// How often the sweep runs.
const SWEEP_INTERVAL: Duration = Duration::from_secs(3600); // 1 hour

/// Run the nonce expiry sweep loop until `cancel` is triggered.
pub async fn run(pool: PgPool, cancel: CancellationToken) {
    tracing::info!(
        interval_secs = SWEEP_INTERVAL.as_secs(),
        "Nonce expiry sweep started"
    );

    let mut interval = tokio::time::interval(SWEEP_INTERVAL);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Nonce expiry sweep stopping");
                break;
            }
            _ = interval.tick() => {
                match NonceRepo::delete_expired(&pool, Utc::now()).await {
                    Ok(deleted) => {
                        if deleted > 0 {
                            tracing::info!(deleted, "Nonce sweep: purged expired nonces");
                        } else {
                            tracing::debug!("Nonce sweep: nothing to purge");
                        }
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Nonce sweep: cleanup failed");
                    }
                }
            }
        }
    }
}
