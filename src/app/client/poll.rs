//! Bounded status polling
//!
//! A job is queried up to `max_attempts` times, `check_interval` apart,
//! until the service reports `completed` or `failed`. The first terminal
//! answer ends the wait. A failed status query aborts the wait as-is; it is
//! never absorbed into the attempt budget.
//!
//! ```text
//!  submitted ──(completed)──▶ completed
//!      │  ╲
//!      │   ╲──(failed)─────▶ failed
//!      │
//!      └──(budget spent)───▶ timed out (PollTimeout)
//! ```

use std::collections::HashSet;
use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::app::models::{JobState, JobStatus};
use crate::constants::defaults;
use crate::errors::{ClientError, ClientResult};

/// Polling budget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollConfig {
    /// Delay between two status queries
    pub check_interval: Duration,
    /// Maximum number of status queries
    pub max_attempts: u32,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            check_interval: defaults::CHECK_INTERVAL,
            max_attempts: defaults::MAX_ATTEMPTS,
        }
    }
}

impl PollConfig {
    pub fn new(check_interval: Duration, max_attempts: u32) -> Self {
        Self {
            check_interval,
            max_attempts,
        }
    }

    /// Worst-case wall-clock budget: `check_interval * max_attempts`
    pub fn bound(&self) -> Duration {
        self.check_interval.saturating_mul(self.max_attempts)
    }
}

/// Query `fetch` until it reports a terminal status or the budget runs out
///
/// No sleep follows the final attempt. When `cancel` fires during a sleep
/// the wait ends with `ClientError::Cancelled`.
pub async fn poll_until_terminal<F, Fut>(
    job_id: &str,
    config: &PollConfig,
    cancel: &CancellationToken,
    mut fetch: F,
) -> ClientResult<JobState>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = ClientResult<JobState>>,
{
    info!(
        job_id,
        check_interval = ?config.check_interval,
        max_attempts = config.max_attempts,
        "waiting for job completion"
    );

    let mut reported_unrecognized: HashSet<String> = HashSet::new();

    for attempt in 1..=config.max_attempts {
        let state = fetch().await?;

        if state.status.is_terminal() {
            info!(job_id, status = %state.status, attempt, "job reached terminal status");
            return Ok(state);
        }

        if let JobStatus::Unrecognized(raw) = &state.status {
            if reported_unrecognized.insert(raw.clone()) {
                warn!(job_id, status = %raw, "service reported an unrecognized job status");
            }
        }

        if attempt == config.max_attempts {
            break;
        }

        debug!(
            job_id,
            status = %state.status,
            "[{}/{}] job still running, checking again in {:?}",
            attempt,
            config.max_attempts,
            config.check_interval
        );

        tokio::select! {
            _ = tokio::time::sleep(config.check_interval) => {}
            _ = cancel.cancelled() => {
                warn!(job_id, attempt, "wait for job cancelled");
                return Err(ClientError::Cancelled {
                    job_id: job_id.to_string(),
                    attempts: attempt,
                });
            }
        }
    }

    let err = ClientError::PollTimeout {
        job_id: job_id.to_string(),
        attempts: config.max_attempts,
        bound: config.bound(),
    };
    tracing::error!("{}", err);
    Err(err)
}
