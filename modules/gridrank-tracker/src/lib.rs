//! Polling orchestration for grid-rank keyword checks.
//!
//! The backend computes ranking reports asynchronously; this crate owns the
//! client-side protocol around that: submit a check, poll its status on a
//! fixed cadence under a hard attempt cap, synthesize display progress,
//! materialize the finished report, and watch the listing-wide processing
//! set to recover state after a reload.

pub mod error;
pub mod materialize;
pub mod notify;
pub mod poll;
pub mod progress;
pub mod session;
pub mod tracker;
pub mod watcher;

pub use error::{Result, TrackError};
pub use materialize::{select_latest_date, MaterializedReport};
pub use notify::{NoopNotifier, Notifier, TracingNotifier, TrackEvent};
pub use poll::{poll_until, PollConfig, PollOutcome};
pub use session::{CheckState, PollingSession};
pub use tracker::{CheckOutcome, RankTracker, TrackerConfig};
pub use watcher::{ProcessingWatcher, WatchOutcome, WatcherAction, WatcherConfig};
