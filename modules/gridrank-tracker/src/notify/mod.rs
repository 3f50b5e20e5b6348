pub mod backend;
pub mod log;
pub mod noop;

pub use backend::Notifier;
pub use log::TracingNotifier;
pub use noop::NoopNotifier;

use std::fmt;

use gridrank_common::Target;

/// User-visible tracking events, the toast layer of a consuming UI.
/// Every error the orchestration consumes surfaces through one of these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackEvent {
    /// Submit accepted without a pollable job id; the watcher will surface
    /// completion later.
    CheckQueued { target: Target },
    CheckCompleted { keyword_id: i64 },
    CheckFailed { message: String },
    CheckTimedOut { attempts: u32 },
    KeywordsRefreshed { count: usize },
}

impl fmt::Display for TrackEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CheckQueued { target } => {
                write!(f, "Ranking check for {target} queued; results will appear when ready")
            }
            Self::CheckCompleted { keyword_id } => {
                write!(f, "Ranking report ready for keyword {keyword_id}")
            }
            Self::CheckFailed { message } => write!(f, "Ranking check failed: {message}"),
            Self::CheckTimedOut { attempts } => write!(
                f,
                "Ranking check is taking too long ({attempts} status checks); try again later"
            ),
            Self::KeywordsRefreshed { count } => {
                write!(f, "Keyword list refreshed ({count} keywords)")
            }
        }
    }
}
