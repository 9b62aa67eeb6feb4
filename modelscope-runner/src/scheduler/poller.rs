//! Job poller
//!
//! Polls the task endpoint for one submitted image job until it succeeds,
//! fails, runs out of budget or is cancelled. Each call owns its own poll
//! state, so any number of jobs can be polled concurrently through the same
//! poller; a job's backoff sleep only suspends its own task.

use std::sync::Arc;
use std::time::Duration;

use modelscope_core::domain::job::{Artifacts, JobHandle, JobStatus};
use tokio::time::{self, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::PollPolicy;
use crate::repository::StatusFetcher;
use crate::scheduler::backoff::Backoff;
use crate::scheduler::error::JobError;

/// Receives progress events while a job is being polled
///
/// Both callbacks default to doing nothing.
pub trait PollObserver: Send + Sync {
    /// Called after every successful status fetch
    fn on_status(&self, _handle: &JobHandle, _attempt: u32, _status: &JobStatus, _elapsed: Duration) {}

    /// Called right before the poller waits `delay` for the next fetch
    fn on_wait(&self, _handle: &JobHandle, _attempt: u32, _delay: Duration) {}
}

/// Observer that ignores every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl PollObserver for NoopObserver {}

/// Successful end of a poll loop
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub artifacts: Artifacts,
    /// Number of status fetches performed
    pub attempts: u32,
    pub elapsed: Duration,
}

/// Per-job loop state; never shared between jobs
struct PollState {
    attempts: u32,
    backoff: Backoff,
    started: Instant,
}

impl PollState {
    fn new(policy: &PollPolicy) -> Self {
        Self {
            attempts: 0,
            backoff: Backoff::new(policy),
            started: Instant::now(),
        }
    }
}

/// Drives image jobs to a terminal state
#[derive(Clone)]
pub struct JobPoller {
    fetcher: Arc<dyn StatusFetcher>,
    policy: PollPolicy,
    observer: Arc<dyn PollObserver>,
}

impl JobPoller {
    /// Creates a new job poller
    pub fn new(fetcher: Arc<dyn StatusFetcher>, policy: PollPolicy) -> Self {
        Self {
            fetcher,
            policy,
            observer: Arc::new(NoopObserver),
        }
    }

    /// Attaches a progress observer
    pub fn with_observer(mut self, observer: Arc<dyn PollObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn policy(&self) -> &PollPolicy {
        &self.policy
    }

    /// Polls `handle` until it reaches a terminal state or `budget` elapses
    ///
    /// # Returns
    /// The output artifacts of the succeeded job
    pub async fn poll_until_terminal(
        &self,
        handle: &JobHandle,
        budget: Duration,
    ) -> Result<Artifacts, JobError> {
        self.poll(handle, budget, &CancellationToken::new())
            .await
            .map(|completion| completion.artifacts)
    }

    /// Same as [`poll_until_terminal`](Self::poll_until_terminal), but stops
    /// with [`JobError::Cancelled`] as soon as `cancel` fires
    pub async fn poll_until_terminal_with_cancel(
        &self,
        handle: &JobHandle,
        budget: Duration,
        cancel: &CancellationToken,
    ) -> Result<Artifacts, JobError> {
        self.poll(handle, budget, cancel)
            .await
            .map(|completion| completion.artifacts)
    }

    /// Runs the poll loop and reports how many fetches it took
    ///
    /// A fetch error ends the loop immediately. The budget is checked after
    /// every non-terminal status, so a job whose first fetch is terminal
    /// never sleeps.
    pub async fn poll(
        &self,
        handle: &JobHandle,
        budget: Duration,
        cancel: &CancellationToken,
    ) -> Result<Completion, JobError> {
        if budget.is_zero() {
            return Err(JobError::InvalidBudget);
        }

        let mut state = PollState::new(&self.policy);

        info!(
            "Polling task {} (budget: {:?}, base interval: {:?})",
            handle, budget, self.policy.base_interval
        );

        loop {
            if cancel.is_cancelled() {
                return Err(cancelled(handle, &state));
            }

            let fetched = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(cancelled(handle, &state)),
                fetched = self.fetcher.fetch_status(handle) => fetched,
            };
            state.attempts += 1;

            let snapshot = match fetched {
                Ok(snapshot) => snapshot,
                Err(source) => {
                    warn!(
                        "Status fetch for task {} failed on attempt {}: {}",
                        handle, state.attempts, source
                    );
                    return Err(JobError::StatusFetchFailed {
                        handle: handle.clone(),
                        attempts: state.attempts,
                        source,
                    });
                }
            };

            let elapsed = state.started.elapsed();
            self.observer
                .on_status(handle, state.attempts, &snapshot.status, elapsed);

            match snapshot.status {
                JobStatus::Succeeded => {
                    info!(
                        "Task {} succeeded after {} attempt(s) in {:.1}s with {} image(s)",
                        handle,
                        state.attempts,
                        elapsed.as_secs_f64(),
                        snapshot.artifacts.len()
                    );
                    return Ok(Completion {
                        artifacts: snapshot.artifacts,
                        attempts: state.attempts,
                        elapsed,
                    });
                }
                JobStatus::Failed => {
                    let message = snapshot
                        .error_message
                        .unwrap_or_else(|| "unknown error".to_string());
                    warn!("Task {} failed: {}", handle, message);
                    return Err(JobError::JobFailed {
                        handle: handle.clone(),
                        message,
                    });
                }
                JobStatus::Unknown(ref raw) => {
                    debug!("Task {} reported unrecognized status {:?}", handle, raw);
                }
                JobStatus::Pending | JobStatus::Running => {}
            }

            let progress = (elapsed.as_secs_f64() / budget.as_secs_f64() * 100.0).min(100.0);
            debug!(
                "Task {} is {} (attempt {}, elapsed {:.1}s, {:.0}% of budget)",
                handle,
                snapshot.status,
                state.attempts,
                elapsed.as_secs_f64(),
                progress
            );

            if elapsed >= budget {
                warn!(
                    "Task {} timed out after {} attempt(s), last status {}",
                    handle, state.attempts, snapshot.status
                );
                return Err(JobError::Timeout {
                    handle: handle.clone(),
                    last_status: snapshot.status,
                    attempts: state.attempts,
                    elapsed,
                    budget,
                });
            }

            let delay = state.backoff.advance();
            self.observer.on_wait(handle, state.attempts, delay);
            debug!("Waiting {:?} before polling task {} again", delay, handle);

            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(cancelled(handle, &state)),
                _ = time::sleep(delay) => {}
            }
        }
    }
}

fn cancelled(handle: &JobHandle, state: &PollState) -> JobError {
    info!("Polling of task {} cancelled", handle);
    JobError::Cancelled {
        handle: handle.clone(),
        attempts: state.attempts,
    }
}
