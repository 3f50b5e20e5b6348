use std::fmt;

use gridrank_common::{JobStatus, RankJob};

use crate::progress;

/// Bookkeeping for one in-flight polling session. Exists for at most one job
/// at a time per tracker; `progress` only ever moves up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollingSession {
    pub job_id: i64,
    pub attempt: u32,
    pub max_attempts: u32,
    pub progress: u8,
}

impl PollingSession {
    pub fn new(job_id: i64, max_attempts: u32) -> Self {
        Self {
            job_id,
            attempt: 0,
            max_attempts,
            progress: 0,
        }
    }

    /// Record one empty status response. Progress follows the display curve
    /// and is clamped monotone.
    pub fn record_pending(&mut self, attempt: u32) {
        self.attempt = attempt;
        let estimate = progress::estimate(attempt, progress::FAST_CAP, progress::HOLD_CAP);
        self.progress = self.progress.max(estimate);
    }

    /// The populated response arrived. Consumes the session; there is nothing
    /// left to poll.
    pub fn complete(self) -> CheckState {
        CheckState::Completed {
            keyword_id: self.job_id,
        }
    }

    /// A status check failed. Consumes the session; polling does not resume.
    pub fn fail(self, message: String) -> CheckState {
        CheckState::Failed { message }
    }

    /// The attempt cap was reached without a populated response. Consumes the
    /// session, so a timed-out check can never later complete.
    pub fn time_out(self) -> CheckState {
        CheckState::TimedOut
    }
}

/// One enum per concern: a single tagged state instead of independently
/// toggled loading/checking/refreshing flags and their impossible combinations.
#[derive(Debug, Clone)]
pub enum CheckState {
    Idle,
    Submitted(RankJob),
    Polling(PollingSession),
    Completed { keyword_id: i64 },
    Failed { message: String },
    TimedOut,
}

impl CheckState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Completed { .. } | Self::Failed { .. } | Self::TimedOut
        )
    }

    /// Display progress for the current state, if a bar should be shown.
    pub fn progress(&self) -> Option<u8> {
        match self {
            Self::Polling(session) => Some(session.progress),
            Self::Completed { .. } => Some(100),
            _ => None,
        }
    }

    /// Backend-job view of the current state. A timed-out check maps to
    /// `Processing`: the client gave up, the backend may still be working.
    pub fn job_status(&self) -> Option<JobStatus> {
        match self {
            Self::Idle => None,
            Self::Submitted(_) => Some(JobStatus::Queued),
            Self::Polling(_) | Self::TimedOut => Some(JobStatus::Processing),
            Self::Completed { .. } => Some(JobStatus::Done),
            Self::Failed { .. } => Some(JobStatus::Error),
        }
    }
}

impl fmt::Display for CheckState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Submitted(job) => write!(f, "submitted:{}", job.id),
            Self::Polling(session) => {
                write!(f, "polling:{} ({}%)", session.job_id, session.progress)
            }
            Self::Completed { keyword_id } => write!(f, "completed:{keyword_id}"),
            Self::Failed { message } => write!(f, "failed: {message}"),
            Self::TimedOut => write!(f, "timed_out"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_is_monotone_under_pending_ticks() {
        let mut session = PollingSession::new(42, 60);
        let mut last = 0;
        for attempt in 1..=60 {
            session.record_pending(attempt);
            assert!(session.progress >= last);
            assert!(session.progress <= 100);
            last = session.progress;
        }
        assert_eq!(session.progress, 99);
    }

    #[test]
    fn early_pending_ticks_follow_the_curve() {
        let mut session = PollingSession::new(42, 60);
        let mut observed = Vec::new();
        for attempt in 1..=3 {
            session.record_pending(attempt);
            observed.push(session.progress);
        }
        assert_eq!(observed, vec![10, 20, 30]);
    }

    #[test]
    fn completion_reports_full_progress() {
        let session = PollingSession::new(7, 60);
        let state = session.complete();
        assert_eq!(state.progress(), Some(100));
        assert!(state.is_terminal());
    }

    #[test]
    fn timed_out_state_is_terminal() {
        let session = PollingSession::new(7, 60);
        let state = session.time_out();
        assert!(state.is_terminal());
        assert_eq!(state.progress(), None);
        // The backend may still be working; only the client gave up.
        assert_eq!(state.job_status(), Some(JobStatus::Processing));
    }

    #[test]
    fn job_status_tracks_the_lifecycle() {
        assert_eq!(CheckState::Idle.job_status(), None);

        let job = RankJob::new(7, gridrank_common::Target::Listing(1));
        assert_eq!(
            CheckState::Submitted(job).job_status(),
            Some(JobStatus::Queued)
        );

        let session = PollingSession::new(7, 60);
        assert_eq!(
            CheckState::Polling(session.clone()).job_status(),
            Some(JobStatus::Processing)
        );
        assert_eq!(session.complete().job_status(), Some(JobStatus::Done));
    }
}
