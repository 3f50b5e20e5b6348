use std::sync::{Arc, RwLock};
use std::time::Duration;

use tracing::{info, warn};

use gridrank_client::{RankApiClient, RankCheckRequest};
use gridrank_common::{RankJob, Target};

use crate::error::{Result, TrackError};
use crate::materialize::{self, MaterializedReport};
use crate::notify::{Notifier, TrackEvent};
use crate::poll::{poll_until, PollConfig, PollOutcome};
use crate::session::{CheckState, PollingSession};

#[derive(Debug, Clone, Copy)]
pub struct TrackerConfig {
    pub poll: PollConfig,
    /// How long the forced 100% stays visible before results replace it.
    pub completion_hold: Duration,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            poll: PollConfig::default(),
            completion_hold: Duration::from_secs(2),
        }
    }
}

/// Outcome of one submit-or-refresh flow.
#[derive(Debug)]
pub enum CheckOutcome {
    Completed(MaterializedReport),
    /// The backend queued the check without handing back a pollable job id;
    /// the status watcher surfaces completion later.
    AlreadyQueued,
    TimedOut { attempts: u32 },
}

/// Orchestrates ranking checks end-to-end: validate, submit, poll the job,
/// materialize the finished report. Every error is consumed here and
/// surfaced through the notifier; callers additionally get the typed error.
pub struct RankTracker {
    client: Arc<RankApiClient>,
    notifier: Arc<dyn Notifier>,
    config: TrackerConfig,
    state: RwLock<CheckState>,
}

impl RankTracker {
    pub fn new(client: Arc<RankApiClient>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            client,
            notifier,
            config: TrackerConfig::default(),
            state: RwLock::new(CheckState::Idle),
        }
    }

    pub fn with_config(mut self, config: TrackerConfig) -> Self {
        self.config = config;
        self
    }

    /// Snapshot of the current check state.
    pub fn state(&self) -> CheckState {
        self.state.read().expect("state lock poisoned").clone()
    }

    /// Start a ranking check for new keywords. Inputs are validated before
    /// anything is sent; a submit without a job id is fire-and-forget.
    pub async fn check_rank(&self, request: RankCheckRequest) -> Result<CheckOutcome> {
        validate(&request)?;
        self.ensure_not_polling()?;

        let receipt = match self.client.add_keywords(&request).await {
            Ok(receipt) => receipt,
            Err(e) => return Err(self.submit_failed(e).await),
        };

        let Some(keyword_id) = receipt.keyword_id else {
            info!(target = %request.target, "Check already queued, leaving completion to the watcher");
            self.emit(TrackEvent::CheckQueued {
                target: request.target,
            })
            .await;
            return Ok(CheckOutcome::AlreadyQueued);
        };

        self.set_state(CheckState::Submitted(RankJob::new(
            keyword_id,
            request.target,
        )));
        info!(keyword_id, target = %request.target, "Ranking check started, polling for completion");
        self.poll_and_materialize(request.target, keyword_id).await
    }

    /// Re-run the check for an existing keyword.
    pub async fn refresh_rank(&self, target: Target, keyword_id: i64) -> Result<CheckOutcome> {
        self.ensure_not_polling()?;

        let receipt = match self.client.refresh_keyword(target, keyword_id).await {
            Ok(receipt) => receipt,
            Err(e) => return Err(self.submit_failed(e).await),
        };

        let Some(job_id) = receipt.keyword_id else {
            info!(target = %target, keyword_id, "Refresh already queued, leaving completion to the watcher");
            self.emit(TrackEvent::CheckQueued { target }).await;
            return Ok(CheckOutcome::AlreadyQueued);
        };

        self.set_state(CheckState::Submitted(RankJob::new(job_id, target)));
        info!(keyword_id = job_id, target = %target, "Refresh started, polling for completion");
        self.poll_and_materialize(target, job_id).await
    }

    async fn poll_and_materialize(&self, target: Target, keyword_id: i64) -> Result<CheckOutcome> {
        let mut session = PollingSession::new(keyword_id, self.config.poll.max_attempts);
        self.set_state(CheckState::Polling(session.clone()));

        let client = Arc::clone(&self.client);
        let outcome: std::result::Result<PollOutcome<_>, gridrank_client::ClientError> = poll_until(
            self.config.poll,
            move |_attempt| {
                let client = Arc::clone(&client);
                async move {
                    let details = client.get_keyword_details(keyword_id, None).await?;
                    Ok((!details.dates.is_empty()).then_some(details))
                }
            },
            |attempt| {
                session.record_pending(attempt);
                self.set_state(CheckState::Polling(session.clone()));
            },
        )
        .await;

        match outcome {
            Ok(PollOutcome::Completed(details)) => {
                self.set_state(session.complete());
                // Hold the full bar briefly before the view swaps to results.
                tokio::time::sleep(self.config.completion_hold).await;

                let report =
                    match materialize::materialize(&self.client, target, keyword_id, details).await
                    {
                        Ok(report) => report,
                        Err(e) => {
                            let message = e.to_string();
                            self.set_state(CheckState::Failed {
                                message: message.clone(),
                            });
                            self.emit(TrackEvent::CheckFailed { message }).await;
                            return Err(e.into());
                        }
                    };

                self.emit(TrackEvent::CheckCompleted { keyword_id }).await;
                self.emit(TrackEvent::KeywordsRefreshed {
                    count: report.keywords.keywords.len(),
                })
                .await;
                Ok(CheckOutcome::Completed(report))
            }
            Ok(PollOutcome::TimedOut { attempts }) => {
                warn!(keyword_id, attempts, "Ranking check timed out");
                self.set_state(session.time_out());
                self.emit(TrackEvent::CheckTimedOut { attempts }).await;
                Ok(CheckOutcome::TimedOut { attempts })
            }
            Err(e) => {
                let message = e.to_string();
                self.set_state(session.fail(message.clone()));
                self.emit(TrackEvent::CheckFailed { message }).await;
                Err(e.into())
            }
        }
    }

    async fn submit_failed(&self, e: gridrank_client::ClientError) -> TrackError {
        let message = e.to_string();
        self.set_state(CheckState::Failed {
            message: message.clone(),
        });
        self.emit(TrackEvent::CheckFailed { message }).await;
        e.into()
    }

    /// One polling session per tracker at a time.
    fn ensure_not_polling(&self) -> Result<()> {
        if matches!(self.state(), CheckState::Polling(_)) {
            return Err(TrackError::Validation(
                "a ranking check is already in progress".to_string(),
            ));
        }
        Ok(())
    }

    fn set_state(&self, next: CheckState) {
        *self.state.write().expect("state lock poisoned") = next;
    }

    async fn emit(&self, event: TrackEvent) {
        if let Err(e) = self.notifier.notify(&event).await {
            warn!(error = %e, "Failed to deliver notification");
        }
    }
}

/// Reject incomplete input before any network call.
fn validate(request: &RankCheckRequest) -> Result<()> {
    if request.keywords.iter().all(|k| k.trim().is_empty()) {
        return Err(TrackError::Validation("no keywords entered".to_string()));
    }
    if request.coordinates.is_none() {
        return Err(TrackError::Validation(
            "no coordinates resolved".to_string(),
        ));
    }
    Ok(())
}
