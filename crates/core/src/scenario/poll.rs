//! Bounded polling.

use std::future::Future;

use tokio::time::Instant;
use tracing::{debug, warn};

use crate::config::PollConfig;
use crate::error::ProbeError;
use crate::status_api::StatusApiError;
use crate::tracking::JobStage;

/// Call `attempt` until it yields a value or the budget runs out.
///
/// API errors are logged and retried on the next attempt. Attempts are
/// separated by `config.interval()`; once `config.budget()` has elapsed the
/// call fails with [`ProbeError::Timeout`].
pub async fn poll_until<T, F, Fut>(
    stage: JobStage,
    config: &PollConfig,
    mut attempt: F,
) -> Result<T, ProbeError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Option<T>, StatusApiError>>,
{
    let budget = config.budget();
    let interval = config.interval();
    let started = Instant::now();
    let mut attempts = 0u32;

    while started.elapsed() < budget {
        attempts += 1;

        match attempt().await {
            Ok(Some(found)) => {
                debug!("{} poll succeeded after {} attempts", stage, attempts);
                return Ok(found);
            }
            Ok(None) => debug!("{} poll attempt {}: not ready", stage, attempts),
            Err(e) => warn!("{} poll attempt {} failed: {}", stage, attempts, e),
        }

        let remaining = budget.saturating_sub(started.elapsed());
        if remaining.is_zero() {
            break;
        }
        tokio::time::sleep(interval.min(remaining)).await;
    }

    Err(ProbeError::Timeout { stage, budget })
}
