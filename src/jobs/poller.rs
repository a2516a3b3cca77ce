//! Fixed-interval status polling for long-running generation tasks.
//!
//! # Polling model
//!
//! ```text
//! Poller::start(task_id, observer) ──▶ spawned tokio task
//!
//!   loop:
//!     cancelled?            ──▶ stop silently
//!     GET /api/tasks/{id}
//!       Err(transport)      ──▶ warn + swallow, keep polling
//!       Ok(non-terminal)    ──▶ observer.on_status(...)
//!       Ok(completed)       ──▶ observer.on_terminal(Ok | ResultMissing), stop
//!       Ok(failed)          ──▶ observer.on_terminal(Err(Failed)), stop
//!     attempts exhausted?   ──▶ observer.on_terminal(Err(TimedOut)), stop
//!     sleep(interval)          // measured from completion of the attempt
//! ```
//!
//! Exactly one poll request is in flight per task at any instant — the next
//! attempt is not issued until the previous one resolves, so backend latency
//! can never pile requests up. Cancellation is cooperative: it cannot abort
//! an in-flight request, but the token is re-checked when that request
//! resolves so its result is discarded instead of reaching the observer.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::api::types::{TaskResponse, TaskStatus};
use crate::api::StudioBackend;
use crate::config::PollConfig;

use super::JobError;

// ---------------------------------------------------------------------------
// CancellationToken
// ---------------------------------------------------------------------------

/// Cooperative cancellation handle for one polling loop.
///
/// Cloning shares the underlying flag; any clone can cancel. Once cancelled
/// the loop performs no further observer notifications, even for a poll
/// request that was already in flight.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Idempotent.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

// ---------------------------------------------------------------------------
// SynthesisOutcome
// ---------------------------------------------------------------------------

/// The usable payload of a completed synthesis task.
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesisOutcome {
    /// Backend-relative URL of the produced artifact.
    pub audio_url: String,
    pub filename: String,
    /// Length in seconds, when the backend reported one.
    pub duration: Option<f64>,
}

// ---------------------------------------------------------------------------
// JobObserver
// ---------------------------------------------------------------------------

/// Receives polling progress and the single terminal notification.
///
/// Implementors must be `Send + Sync`; the poller calls them from its
/// spawned task. `on_terminal` fires exactly once per polling loop — never
/// after cancellation.
#[async_trait]
pub trait JobObserver: Send + Sync {
    /// A non-terminal status was observed; polling continues.
    async fn on_status(&self, task_id: &str, status: TaskStatus);

    /// The loop ended: completed result, server-reported failure, a
    /// malformed completion payload, or poll-budget exhaustion.
    async fn on_terminal(&self, task_id: &str, outcome: Result<SynthesisOutcome, JobError>);
}

// ---------------------------------------------------------------------------
// Poller
// ---------------------------------------------------------------------------

/// Spawns and supervises one polling loop per submitted task.
pub struct Poller {
    backend: Arc<dyn StudioBackend>,
    interval: Duration,
    max_attempts: u32,
}

impl Poller {
    pub fn new(backend: Arc<dyn StudioBackend>, config: &PollConfig) -> Self {
        Self {
            backend,
            interval: config.interval(),
            max_attempts: config.max_attempts,
        }
    }

    /// Start polling `task_id`, reporting progress to `observer`.
    ///
    /// Returns immediately with a [`CancellationToken`]; the loop runs on a
    /// spawned tokio task until a terminal status, the attempt budget, or
    /// cancellation ends it.
    pub fn start(&self, task_id: String, observer: Arc<dyn JobObserver>) -> CancellationToken {
        let token = CancellationToken::new();
        self.start_with(task_id, observer, token.clone());
        token
    }

    /// Like [`start`](Self::start), but polls under a caller-supplied token.
    ///
    /// Lets the caller register the token (e.g. in the session store) before
    /// the first poll can possibly resolve, closing the race where a very
    /// fast terminal response would arrive for an unregistered job.
    pub fn start_with(
        &self,
        task_id: String,
        observer: Arc<dyn JobObserver>,
        token: CancellationToken,
    ) {
        let guard = token;
        let backend = Arc::clone(&self.backend);
        let interval = self.interval;
        let max_attempts = self.max_attempts;

        tokio::spawn(async move {
            let mut attempts: u32 = 0;

            loop {
                if guard.is_cancelled() {
                    log::debug!("poll: task {task_id} cancelled, stopping");
                    return;
                }

                attempts += 1;

                match backend.task_status(&task_id).await {
                    Ok(task) => {
                        // The request may have resolved after a cancellation
                        // issued while it was in flight — discard its effect.
                        if guard.is_cancelled() {
                            log::debug!("poll: task {task_id} cancelled mid-flight, discarding");
                            return;
                        }

                        match task.status {
                            TaskStatus::Completed => {
                                observer.on_terminal(&task_id, extract_outcome(task)).await;
                                return;
                            }
                            TaskStatus::Failed => {
                                let message = task
                                    .error
                                    .filter(|e| !e.is_empty())
                                    .unwrap_or_else(|| "unknown error".into());
                                observer
                                    .on_terminal(&task_id, Err(JobError::Failed(message)))
                                    .await;
                                return;
                            }
                            status => {
                                observer.on_status(&task_id, status).await;
                            }
                        }
                    }
                    // Transient poll failure: the job is still expected to
                    // reach a terminal state, so log and try again.
                    Err(e) => {
                        log::warn!("poll: attempt {attempts} for task {task_id} failed: {e}");
                    }
                }

                if attempts >= max_attempts {
                    if guard.is_cancelled() {
                        return;
                    }
                    log::error!("poll: task {task_id} exhausted {attempts} attempts");
                    observer
                        .on_terminal(&task_id, Err(JobError::TimedOut { attempts }))
                        .await;
                    return;
                }

                tokio::time::sleep(interval).await;
            }
        });
    }
}

/// Validate the payload of a `completed` task.
fn extract_outcome(task: TaskResponse) -> Result<SynthesisOutcome, JobError> {
    let result = task.result.ok_or_else(|| {
        JobError::ResultMissing("completed task carried no result payload".into())
    })?;

    let audio_url = result
        .audio_url
        .filter(|u| !u.is_empty())
        .ok_or_else(|| JobError::ResultMissing("no audio URL in result".into()))?;

    let filename = result
        .filename
        .filter(|f| !f.is_empty())
        .ok_or_else(|| JobError::ResultMissing("no filename in result".into()))?;

    Ok(SynthesisOutcome {
        audio_url,
        filename,
        duration: result.duration,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
